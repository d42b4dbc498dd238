use pretty_assertions::assert_eq;
use arbor::config::EngineConfig;
use arbor::uci::UciEngine;

fn engine() -> UciEngine<Vec<u8>> {
    let cfg = EngineConfig { threads: 1, hash_mb: 4, depth: 2, ..EngineConfig::default() };
    UciEngine::new(cfg, Vec::new()).unwrap()
}

fn run(e: &mut UciEngine<Vec<u8>>, lines: &[&str]) -> String {
    for l in lines {
        e.handle_line(l).unwrap();
    }
    String::from_utf8(e.output().clone()).unwrap()
}

#[test]
fn handshake() {
    let mut e = engine();
    let out = run(&mut e, &["uci", "isready"]);
    assert!(out.contains("id name Arbor"));
    assert!(out.contains("uciok\n"));
    assert!(out.ends_with("readyok\n"));
}

#[test]
fn go_depth_prints_bestmove() {
    let mut e = engine();
    let out = run(&mut e, &["position startpos moves e2e4 e7e5", "go depth 2"]);
    let last = out.lines().last().unwrap();
    assert!(last.starts_with("bestmove "), "{out}");
    assert!(out.contains("info depth 2 score cp "), "{out}");
}

#[test]
fn go_finds_mate_in_one() {
    let mut e = engine();
    let out = run(&mut e, &["position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "go depth 1"]);
    assert!(out.contains("score mate 1"), "{out}");
    assert!(out.ends_with("bestmove a1a8\n"), "{out}");
}

#[test]
fn checkmated_position_reports_null_move() {
    let mut e = engine();
    let out = run(&mut e, &["position fen R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", "go depth 3"]);
    assert_eq!(out, "bestmove 0000\n");
}

#[test]
fn illegal_move_keeps_previous_position() {
    let mut e = engine();
    let before = run(&mut e, &["position startpos moves e2e4"]);
    assert!(before.is_empty());
    let fen = e.position().fen();
    let out = run(&mut e, &["position startpos moves e2e4 e2e4"]);
    assert!(out.starts_with("info string "), "{out}");
    assert_eq!(e.position().fen(), fen);
}

#[test]
fn malformed_commands_are_reported_not_fatal() {
    let mut e = engine();
    let out = run(&mut e, &["go depth x", "setoption name Bogus value 1", "frobnicate", "position"]);
    assert_eq!(out.lines().filter(|l| l.starts_with("info string ")).count(), 4, "{out}");
    assert!(e.handle_line("isready").unwrap());
}

#[test]
fn setoption_updates_config() {
    let mut e = engine();
    run(&mut e, &["setoption name Threads value 2", "setoption name Depth value 3", "setoption name Hash value 2"]);
    assert_eq!(e.config().threads, 2);
    assert_eq!(e.config().depth, 3);
    assert_eq!(e.config().hash_mb, 2);
    let out = run(&mut e, &["setoption name Threads value 0"]);
    assert!(out.contains("info string "), "{out}");
    assert_eq!(e.config().threads, 2);
}

#[test]
fn quit_stops_the_loop() {
    let mut e = engine();
    let input = "isready\nquit\nisready\n";
    e.run_loop(input.as_bytes()).unwrap();
    assert_eq!(String::from_utf8(e.output().clone()).unwrap(), "readyok\n");
}

#[test]
fn go_movetime_returns_a_move() {
    let mut e = engine();
    let out = run(&mut e, &["ucinewgame", "position startpos", "go movetime 30"]);
    assert!(out.lines().last().unwrap().starts_with("bestmove "), "{out}");
}

#[test]
fn out_of_range_hash_is_rejected() {
    let mut e = engine();
    let out = run(&mut e, &["setoption name Hash value 18446744073709551615", "setoption name Hash value 0"]);
    assert_eq!(out.lines().filter(|l| l.starts_with("info string ")).count(), 2, "{out}");
    assert_eq!(e.config().hash_mb, 4);
    assert!(e.handle_line("isready").unwrap());
}
