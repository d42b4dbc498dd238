use arbor::board::cozy::Position;
use arbor::search::eval::{material_eval_cp, EvalKind, MATE_SCORE};
use arbor::search::root::{Engine, SearchParams};
use cozy_chess::Board;

fn engine(eval: EvalKind) -> Engine<EvalKind> {
    Engine::new(eval, 8, 1).expect("engine")
}

#[test]
fn eval_material_startpos_is_zero() {
    assert_eq!(material_eval_cp(&Board::default()), 0);
}

#[test]
fn search_returns_legal_move_startpos() {
    let pos = Position::startpos();
    let bm = engine(EvalKind::Pst).best_move(&pos, 1, 1).unwrap().expect("no move at depth 1");
    assert!(pos.parse_uci(&pos.move_to_uci(bm)).is_ok());
}

#[test]
fn material_only_search_returns_legal_move() {
    let pos = Position::startpos();
    let r = engine(EvalKind::Material).search(&pos, &SearchParams { depth: 2, ..SearchParams::default() }).unwrap();
    assert!(r.bestmove.is_some());
    assert_eq!(r.score, 0, "material is level after two plies from the start");
}

#[test]
fn search_prefers_winning_queen_capture() {
    // Qe2xd2 wins a queen.
    let pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").unwrap();
    let bm = engine(EvalKind::Pst).best_move(&pos, 1, 1).unwrap().expect("expected a best move");
    assert_eq!(pos.move_to_uci(bm), "e2d2");
}

#[test]
fn finds_back_rank_mate() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    for depth in [1, 3] {
        let r = engine(EvalKind::Pst).search(&pos, &SearchParams { depth, ..SearchParams::default() }).unwrap();
        assert_eq!(pos.move_to_uci(r.bestmove.unwrap()), "a1a8", "depth {depth}");
        assert!(r.score >= MATE_SCORE, "depth {depth} score {}", r.score);
    }
}

#[test]
fn no_move_when_checkmated_or_stalemated() {
    let e = engine(EvalKind::Pst);
    let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert_eq!(e.best_move(&mated, 3, 2).unwrap(), None);
    let stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let r = e.search(&stale, &SearchParams { depth: 3, ..SearchParams::default() }).unwrap();
    assert!(r.bestmove.is_none());
    assert_eq!(r.nodes, 0);
}

#[test]
fn single_legal_move_is_returned() {
    // Rook check along the first rank; g2 is the only flight square.
    let pos = Position::from_fen("k7/8/8/8/8/8/7P/r6K w - - 0 1").unwrap();
    let moves: Vec<String> = {
        use arbor::board::Rules;
        pos.legal_moves().into_iter().map(|m| pos.move_to_uci(m)).collect()
    };
    assert_eq!(moves, vec!["h1g2".to_string()]);
    let bm = engine(EvalKind::Pst).best_move(&pos, 4, 4).unwrap().unwrap();
    assert_eq!(pos.move_to_uci(bm), moves[0]);
}
