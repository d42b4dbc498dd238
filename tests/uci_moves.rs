use arbor::board::cozy::Position;
use arbor::error::BoardError;
use cozy_chess::Color;

#[test]
fn apply_startpos_moves_sequence() {
    let moves = vec!["e2e4".to_string(), "e7e5".to_string(), "g1f3".to_string()];
    let pos = Position::set_from_start_and_moves(&moves).expect("legal move sequence");
    assert_eq!(pos.side_to_move(), Color::Black, "expected black to move after 3 plies");
}

#[test]
fn illegal_move_is_reported() {
    let moves = vec!["e2e4".to_string(), "e2e4".to_string()];
    let err = Position::set_from_start_and_moves(&moves).unwrap_err();
    assert_eq!(err, BoardError::IllegalMove("e2e4".to_string()));
}

#[test]
fn fen_then_moves_with_promotion() {
    let pos = Position::from_fen_and_moves("8/P6k/8/8/8/8/8/K7 w - - 0 1", &["a7a8q".to_string()]).unwrap();
    assert!(pos.fen().starts_with("Q7/"), "{}", pos.fen());
}

#[test]
fn bad_fen_is_rejected() {
    assert!(matches!(Position::from_fen("not a fen"), Err(BoardError::BadFen(_))));
}
