use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use log::error;
use crate::board::Rules;
use crate::error::SearchError;
use crate::search::eval::{date_terminal, Evaluator, Score, INFINITY};
use crate::search::tt::{Bound, Entry, Tt};

const DEADLINE_POLL_MASK: u64 = 1023;

/// Sequential minimax search with alpha-beta pruning over one subtree.
///
/// Scores are from the root mover's perspective: `maximizing` is true at
/// nodes where that side is to move. The cache stores scores from the side
/// to move's perspective so entries survive a change of root side.
pub struct Searcher<'a, E> {
    tt: &'a Tt,
    eval: &'a E,
    use_tt: bool,
    use_pruning: bool,
    deadline: Option<Instant>,
    abort: Option<&'a AtomicBool>,
    pub(crate) nodes: u64,
}

impl<'a, E> Searcher<'a, E> {
    pub fn new(tt: &'a Tt, eval: &'a E) -> Self {
        Self { tt, eval, use_tt: true, use_pruning: true, deadline: None, abort: None, nodes: 0 }
    }

    pub fn with_tt(mut self, on: bool) -> Self { self.use_tt = on; self }

    pub fn with_pruning(mut self, on: bool) -> Self { self.use_pruning = on; self }

    /// Stop at `deadline`, raising `abort` so sibling workers stop too.
    pub fn with_deadline(mut self, deadline: Option<Instant>, abort: &'a AtomicBool) -> Self {
        self.deadline = deadline;
        self.abort = Some(abort);
        self
    }

    pub fn nodes(&self) -> u64 { self.nodes }

    fn check_abort(&self) -> Result<(), SearchError> {
        let Some(flag) = self.abort else { return Ok(()) };
        if flag.load(Ordering::Relaxed) { return Err(SearchError::Aborted); }
        if self.nodes & DEADLINE_POLL_MASK == 0 {
            if let Some(dl) = self.deadline {
                if Instant::now() >= dl {
                    flag.store(true, Ordering::Relaxed);
                    return Err(SearchError::Aborted);
                }
            }
        }
        Ok(())
    }

    fn probe(&self, key: u64, depth: u32, alpha: Score, beta: Score, maximizing: bool) -> Option<Score> {
        if !self.use_tt { return None; }
        let e = self.tt.get(key, depth)?;
        let (score, bound) = if maximizing { (e.score, e.bound) } else { (-e.score, e.bound.flip()) };
        match bound {
            Bound::Exact => Some(score),
            Bound::Lower if score >= beta => Some(score),
            Bound::Upper if score <= alpha => Some(score),
            _ => None,
        }
    }

    fn store(&self, key: u64, depth: u32, score: Score, bound: Bound, maximizing: bool) {
        if !self.use_tt { return; }
        let (score, bound) = if maximizing { (score, bound) } else { (-score, bound.flip()) };
        self.tt.put(Entry { key, depth, score, bound, gen: 0 });
    }
}

impl<'a, E> Searcher<'a, E> {
    pub fn search<P>(&mut self, pos: &mut P, depth: u32, alpha: Score, beta: Score, maximizing: bool) -> Result<Score, SearchError>
    where
        P: Rules,
        E: Evaluator<P>,
    {
        self.search_with_move(pos, depth, alpha, beta, maximizing).map(|(s, _)| s)
    }

    /// As `search`, also reporting the move that produced the score. The
    /// move is `None` at leaves and on cache hits.
    pub fn search_with_move<P>(
        &mut self,
        pos: &mut P,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Result<(Score, Option<P::Move>), SearchError>
    where
        P: Rules,
        E: Evaluator<P>,
    {
        self.nodes += 1;
        self.check_abort()?;
        let key = pos.identity();
        if let Some(hit) = self.probe(key, depth, alpha, beta, maximizing) {
            return Ok((hit, None));
        }

        if depth == 0 || pos.is_game_over() {
            let own = date_terminal(self.eval.evaluate(pos), depth);
            let score = if maximizing { own } else { -own };
            self.store(key, depth, score, Bound::Exact, maximizing);
            return Ok((score, None));
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            error!("rules backend produced no moves at an ongoing position (key {key:#018x})");
            return Err(SearchError::EmptyMoveList { key, depth });
        }

        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;
        for m in moves {
            pos.make_move(m);
            let child = self.search(pos, depth - 1, alpha, beta, !maximizing);
            pos.unmake_move(m);
            let score = child?;
            if maximizing {
                if score > best { best = score; best_move = Some(m); }
                alpha = alpha.max(score);
            } else {
                if score < best { best = score; best_move = Some(m); }
                beta = beta.min(score);
            }
            if self.use_pruning && beta <= alpha { break; }
        }

        let bound = if !self.use_pruning { Bound::Exact }
            else if best <= alpha0 { Bound::Upper }
            else if best >= beta0 { Bound::Lower }
            else { Bound::Exact };
        self.store(key, depth, best, bound, maximizing);
        Ok((best, best_move))
    }
}
