use arbor::board::cozy::Position;
use arbor::config::MAX_HASH_MB;
use arbor::search::eval::EvalKind;
use arbor::search::root::{Engine, SearchParams};
use clap::Parser;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "arbor-bench", version, about = "Benchmark Arbor search NPS")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Threads
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Movetime in milliseconds (ignored if depth is set)
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Fixed search depth (overrides movetime when > 0)
    #[arg(long, default_value_t = 0)]
    depth: u32,

    /// Evaluator: pst or material
    #[arg(long, default_value = "pst")]
    eval: EvalKind,

    /// Transposition table size in MB (approximate)
    #[arg(long, default_value_t = 64)]
    hash_mb: usize,

    /// Disable the transposition cache
    #[arg(long, default_value_t = false)]
    no_tt: bool,

    /// Disable alpha-beta cutoffs (full-width minimax)
    #[arg(long, default_value_t = false)]
    no_pruning: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let pos = if args.fen == "startpos" { Position::startpos() } else { Position::from_fen(&args.fen)? };

    anyhow::ensure!((1..=MAX_HASH_MB).contains(&args.hash_mb), "--hash-mb must be in 1..={MAX_HASH_MB}");
    let engine = Engine::new(args.eval, args.hash_mb, args.threads)?;
    let mut p = SearchParams { threads: args.threads.max(1), use_tt: !args.no_tt, use_pruning: !args.no_pruning, ..SearchParams::default() };
    if args.depth > 0 { p.depth = args.depth; } else { p.depth = 0; p.movetime = Some(Duration::from_millis(args.movetime)); }

    let t0 = Instant::now();
    let res = engine.search(&pos, &p)?;
    let dt = t0.elapsed();
    let nps = if dt.as_secs_f64() > 0.0 { res.nodes as f64 / dt.as_secs_f64() } else { 0.0 };
    let best = res.bestmove.map(|m| pos.move_to_uci(m)).unwrap_or_else(|| "(none)".to_string());
    println!("bestmove={} score_cp={} depth={} nodes={} elapsed={:.3}s nps={:.1} hashfull={}",
        best, res.score, res.depth, res.nodes, dt.as_secs_f64(), nps, engine.tt().hashfull());
    Ok(())
}
