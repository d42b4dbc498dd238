use pretty_assertions::assert_eq;
use arbor::board::cozy::Position;
use arbor::search::eval::EvalKind;
use arbor::search::root::{Engine, SearchParams};
use std::time::Duration;

const ITALIAN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 3";

#[test]
fn root_parallel_bestmove_equals_single_thread() {
    let pos = Position::from_fen(ITALIAN).unwrap();
    let p1 = SearchParams { depth: 3, threads: 1, ..SearchParams::default() };
    let r1 = Engine::new(EvalKind::Pst, 16, 1).unwrap().search(&pos, &p1).unwrap();
    let p4 = SearchParams { threads: 4, ..p1 };
    let r4 = Engine::new(EvalKind::Pst, 16, 4).unwrap().search(&pos, &p4).unwrap();
    assert_eq!(r4.score, r1.score, "score differs between single and multi-thread at fixed depth");
    assert_eq!(r4.bestmove, r1.bestmove, "tie-break must not depend on worker timing");
}

#[test]
fn repeated_parallel_searches_agree() {
    let pos = Position::from_fen(ITALIAN).unwrap();
    let engine = Engine::new(EvalKind::Pst, 16, 4).unwrap();
    let p = SearchParams { depth: 3, threads: 4, ..SearchParams::default() };
    let first = engine.search(&pos, &p).unwrap();
    for _ in 0..3 {
        // A warm cache must not change the answer.
        let again = engine.search(&pos, &p).unwrap();
        assert_eq!((again.bestmove, again.score), (first.bestmove, first.score));
    }
}

#[test]
fn more_workers_than_root_moves() {
    let pos = Position::from_fen("k7/8/8/8/8/8/7P/r6K w - - 0 1").unwrap();
    let engine = Engine::new(EvalKind::Pst, 4, 1).unwrap();
    let bm = engine.best_move(&pos, 2, 8).unwrap().unwrap();
    assert_eq!(pos.move_to_uci(bm), "h1g2");
}

#[test]
fn root_parallel_returns_move_with_movetime() {
    let pos = Position::startpos();
    let engine = Engine::new(EvalKind::Pst, 16, 4).unwrap();
    let p = SearchParams { depth: 10, threads: 4, movetime: Some(Duration::from_millis(5)), ..SearchParams::default() };
    let r = engine.search(&pos, &p).unwrap();
    assert!(r.bestmove.is_some(), "no move returned under movetime with threads");
}
