use arbor::board::cozy::Position;
use arbor::config::MAX_HASH_MB;
use arbor::search::eval::EvalKind;
use arbor::search::root::{Engine, SearchParams};
use arbor::selfplay::{play_game, GameResult, Opponent, SelfPlayParams};
use clap::Parser;
use cozy_chess::Color;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "arbor-selfplay", about = "Play the engine against a simple opponent policy")]
struct Args {
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 3)]
    depth: u32,
    #[arg(long)]
    movetime_ms: Option<u64>,
    /// Opponent policy: first, random, engine
    #[arg(long, default_value = "random")]
    opponent: String,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Engine colour: w or b
    #[arg(long, default_value = "w")]
    color: String,
    #[arg(long, default_value_t = 64)]
    hash_mb: usize,
    #[arg(long, default_value = "pst")]
    eval: EvalKind,
    /// Print each game's moves
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let engine_color = match a.color.to_lowercase().as_str() {
        "w" | "white" => Color::White,
        "b" | "black" => Color::Black,
        other => anyhow::bail!("invalid color '{other}': use 'w' or 'b'"),
    };
    anyhow::ensure!((1..=MAX_HASH_MB).contains(&a.hash_mb), "--hash-mb must be in 1..={MAX_HASH_MB}");
    let engine = Engine::new(a.eval, a.hash_mb, a.threads)?;
    let search = SearchParams {
        depth: a.depth,
        threads: a.threads.max(1),
        movetime: a.movetime_ms.map(Duration::from_millis),
        ..SearchParams::default()
    };

    let bar = ProgressBar::new(a.games as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let (mut wins, mut losses, mut draws, mut unfinished) = (0usize, 0usize, 0usize, 0usize);
    for g in 0..a.games {
        let opponent = match a.opponent.as_str() {
            "first" => Opponent::FirstLegal,
            "engine" => Opponent::Engine,
            "random" => Opponent::Random(a.seed.wrapping_add(g as u64)),
            other => anyhow::bail!("unknown opponent '{other}'"),
        };
        engine.new_game();
        let params = SelfPlayParams { engine_color, opponent, search, max_plies: a.max_plies };
        let rec = play_game(&engine, Position::startpos(), &params)?;
        match (rec.result, engine_color) {
            (GameResult::WhiteWins, Color::White) | (GameResult::BlackWins, Color::Black) => wins += 1,
            (GameResult::WhiteWins, _) | (GameResult::BlackWins, _) => losses += 1,
            (GameResult::Draw, _) => draws += 1,
            (GameResult::Unfinished, _) => unfinished += 1,
        }
        if a.verbose { bar.println(format!("game {} {:?}: {}", g + 1, rec.result, rec.moves.join(" "))); }
        bar.set_message(format!("+{wins} -{losses} ={draws} ?{unfinished}"));
        bar.inc(1);
    }
    bar.finish();
    println!("games={} wins={} losses={} draws={} unfinished={}", a.games, wins, losses, draws, unfinished);
    Ok(())
}
