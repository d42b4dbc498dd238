use arbor::board::cozy::Position;
use arbor::search::eval::EvalKind;
use arbor::search::root::{Engine, SearchParams};
use std::time::{Duration, Instant};

#[test]
fn movetime_returns_quickly_with_move() {
    let pos = Position::startpos();
    let engine = Engine::new(EvalKind::Pst, 16, 2).unwrap();
    let params = SearchParams { depth: 0, threads: 2, movetime: Some(Duration::from_millis(20)), ..SearchParams::default() };
    let t0 = Instant::now();
    let res = engine.search(&pos, &params).unwrap();
    let elapsed = t0.elapsed();
    assert!(res.bestmove.is_some(), "no bestmove under movetime");
    assert!(elapsed < Duration::from_millis(1000), "search exceeded time: {:?}", elapsed);
    assert!(!res.completed, "startpos cannot be searched to the depth cap in 20ms");
}

#[test]
fn completed_iterations_match_fixed_depth() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let engine = Engine::new(EvalKind::Pst, 16, 1).unwrap();
    let timed = SearchParams { depth: 2, movetime: Some(Duration::from_secs(30)), ..SearchParams::default() };
    let r = engine.search(&pos, &timed).unwrap();
    assert!(r.completed);
    assert_eq!(r.depth, 2);
    engine.new_game();
    let fixed = engine.search(&pos, &SearchParams { depth: 2, ..SearchParams::default() }).unwrap();
    assert_eq!((r.bestmove, r.score), (fixed.bestmove, fixed.score));
}

#[test]
fn fixed_depth_without_clock_ignores_deadline_machinery() {
    let pos = Position::startpos();
    let engine = Engine::new(EvalKind::Material, 8, 1).unwrap();
    let r = engine.search(&pos, &SearchParams { depth: 2, ..SearchParams::default() }).unwrap();
    assert!(r.completed);
    assert_eq!(r.depth, 2);
    assert!(r.nodes > 20);
}
