use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use crate::board::Rules;
use crate::error::SearchError;
use crate::search::alphabeta::Searcher;
use crate::search::eval::{Evaluator, Score, INFINITY, MAX_DEPTH};
use crate::search::tt::Tt;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Plies from the root; 0 means "as deep as time allows" under a movetime.
    pub depth: u32,
    pub threads: usize,
    pub movetime: Option<Duration>,
    pub use_tt: bool,
    pub use_pruning: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: 1, threads: 1, movetime: None, use_tt: true, use_pruning: true }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub bestmove: Option<M>,
    /// Score of `bestmove` from the root mover's perspective.
    pub score: Score,
    /// Deepest fully completed depth.
    pub depth: u32,
    pub nodes: u64,
    /// False when the deadline cut the requested depth short.
    pub completed: bool,
}

impl<M> SearchResult<M> {
    fn no_move(nodes: u64) -> Self {
        Self { bestmove: None, score: 0, depth: 0, nodes, completed: true }
    }
}

/// Root dispatcher: fans root moves out over a worker pool sharing one
/// transposition cache, then reduces to the best move.
pub struct Engine<E> {
    tt: Arc<Tt>,
    eval: E,
    pool: rayon::ThreadPool,
}

struct RootOutcome<M> {
    scores: Vec<(M, Option<Score>)>,
    nodes: u64,
    aborted: bool,
}

impl<E> Engine<E> {
    pub fn new(eval: E, hash_mb: usize, threads: usize) -> Result<Self, SearchError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
        Ok(Self { tt: Arc::new(Tt::with_capacity_mb(hash_mb)), eval, pool })
    }

    pub fn with_tt(eval: E, tt: Arc<Tt>, threads: usize) -> Result<Self, SearchError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
        Ok(Self { tt, eval, pool })
    }

    pub fn tt(&self) -> &Tt { &self.tt }

    pub fn evaluator(&self) -> &E { &self.eval }

    pub fn threads(&self) -> usize { self.pool.current_num_threads() }

    pub fn set_threads(&mut self, threads: usize) -> Result<(), SearchError> {
        self.pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
        info!("worker pool resized to {} threads", self.threads());
        Ok(())
    }

    /// Replaces the cache; callers must not be searching.
    pub fn set_hash_mb(&mut self, mb: usize) {
        self.tt = Arc::new(Tt::with_capacity_mb(mb));
        info!("transposition cache resized to {} entries", self.tt.capacity());
    }

    pub fn new_game(&self) {
        self.tt.clear();
        info!("new game: transposition cache cleared");
    }
}

impl<E> Engine<E> {
    /// Best move at a fixed depth using `worker_count` workers, or `None`
    /// when the position has no legal moves.
    pub fn best_move<P>(&self, pos: &P, depth: u32, worker_count: usize) -> Result<Option<P::Move>, SearchError>
    where
        P: Rules,
        E: Evaluator<P>,
    {
        let params = SearchParams { depth, threads: worker_count, ..SearchParams::default() };
        Ok(self.search(pos, &params)?.bestmove)
    }

    pub fn search<P>(&self, pos: &P, params: &SearchParams) -> Result<SearchResult<P::Move>, SearchError>
    where
        P: Rules,
        E: Evaluator<P>,
    {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Ok(SearchResult::no_move(0));
        }

        let temp_pool;
        let pool = if params.threads.max(1) == self.pool.current_num_threads() {
            &self.pool
        } else {
            temp_pool = rayon::ThreadPoolBuilder::new().num_threads(params.threads.max(1)).build()?;
            &temp_pool
        };

        let target = match (params.depth, params.movetime) {
            (0, Some(_)) => MAX_DEPTH,
            (0, None) => 1,
            (d, _) => d.min(MAX_DEPTH),
        };
        let Some(movetime) = params.movetime else {
            let out = self.search_root(pool, pos, &moves, target, params, None, None)?;
            let (bestmove, score) = reduce(&out.scores).unwrap_or((moves[0], 0));
            debug!("depth {target} score {score} nodes {} best {:?}", out.nodes, bestmove);
            trace!("tt hashfull {} permille", self.tt.hashfull());
            return Ok(SearchResult { bestmove: Some(bestmove), score, depth: target, nodes: out.nodes, completed: true });
        };

        let deadline = Instant::now() + movetime;
        let abort = AtomicBool::new(false);
        let mut last: Option<(P::Move, Score, u32)> = None;
        let mut nodes = 0u64;
        for d in 1..=target {
            self.tt.bump_generation();
            let out = self.search_root(pool, pos, &moves, d, params, Some(deadline), Some(&abort))?;
            nodes += out.nodes;
            if out.aborted {
                warn!("depth {d} aborted at deadline after {nodes} nodes");
                if last.is_none() {
                    // Nothing finished yet: settle for the completed root moves.
                    let (bm, sc) = reduce(&out.scores).unwrap_or((moves[0], 0));
                    return Ok(SearchResult { bestmove: Some(bm), score: sc, depth: 0, nodes, completed: false });
                }
                break;
            }
            if let Some((bm, sc)) = reduce(&out.scores) {
                debug!("depth {d} score {sc} nodes {nodes} best {:?}", bm);
                last = Some((bm, sc, d));
            }
            if Instant::now() >= deadline { break; }
        }
        let (bestmove, score, depth) = last.unwrap_or((moves[0], 0, 0));
        Ok(SearchResult { bestmove: Some(bestmove), score, depth, nodes, completed: depth == target })
    }

    #[allow(clippy::too_many_arguments)]
    fn search_root<P>(
        &self,
        pool: &rayon::ThreadPool,
        pos: &P,
        moves: &[P::Move],
        depth: u32,
        params: &SearchParams,
        deadline: Option<Instant>,
        abort: Option<&AtomicBool>,
    ) -> Result<RootOutcome<P::Move>, SearchError>
    where
        P: Rules,
        E: Evaluator<P>,
    {
        let tt: &Tt = &self.tt;
        let eval = &self.eval;
        let results: Vec<(P::Move, Result<Score, SearchError>, u64)> = pool.install(|| {
            moves.par_iter().map(|&m| {
                let mut child = pos.clone();
                child.make_move(m);
                let mut w = Searcher::new(tt, eval).with_tt(params.use_tt).with_pruning(params.use_pruning);
                if let Some(flag) = abort { w = w.with_deadline(deadline, flag); }
                let score = w.search(&mut child, depth - 1, -INFINITY, INFINITY, false);
                (m, score, w.nodes())
            }).collect()
        });

        let mut out = RootOutcome { scores: Vec::with_capacity(results.len()), nodes: 0, aborted: false };
        for (m, r, n) in results {
            out.nodes += n;
            match r {
                Ok(s) => out.scores.push((m, Some(s))),
                Err(SearchError::Aborted) => { out.aborted = true; out.scores.push((m, None)); }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}

/// Highest score wins; ties go to the earliest submitted move.
fn reduce<M: Copy>(scores: &[(M, Option<Score>)]) -> Option<(M, Score)> {
    let mut best: Option<(M, Score)> = None;
    for &(m, s) in scores {
        let Some(s) = s else { continue };
        if best.map_or(true, |(_, bs)| s > bs) { best = Some((m, s)); }
    }
    best
}
