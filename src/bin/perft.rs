use arbor::board::cozy::Position;
use arbor::board::Rules;
use arbor::perft::{divide, perft};
use clap::Parser;
use rayon::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver for the Arbor rules adapter")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
    /// Print per-root-move counts
    #[arg(long, default_value_t = false)]
    divide: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let base = if args.fen == "startpos" { Position::startpos() } else { Position::from_fen(&args.fen)? };

    if args.divide {
        let mut pos = base.clone();
        for (m, n) in divide(&mut pos, args.depth) { println!("{}: {}", base.move_to_uci(m), n); }
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let t0 = Instant::now();
    let nodes: u64 = pool.install(|| {
        if args.threads <= 1 || args.depth == 0 {
            perft(&mut base.clone(), args.depth)
        } else {
            base.legal_moves().par_iter().map(|&mv| {
                let mut p = base.clone();
                p.make_move(mv);
                perft(&mut p, args.depth - 1)
            }).sum()
        }
    });
    let dt = t0.elapsed().as_secs_f64();
    if args.nps {
        let nps = if dt > 0.0 { nodes as f64 / dt } else { f64::INFINITY };
        println!("nodes: {} elapsed: {:.3}s nps: {:.1}", nodes, dt, nps);
    } else {
        println!("nodes: {}", nodes);
    }
    Ok(())
}
