use arbor::board::cozy::Position;
use arbor::config::MAX_HASH_MB;
use arbor::search::eval::{EvalKind, MATE_SCORE};
use arbor::search::root::{Engine, SearchParams};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, serde::Deserialize)]
struct Rec { fen: String, best: String }

#[derive(Parser, Debug)]
#[command(name = "arbor-accept", about = "Run a JSONL suite of {fen, best} positions")]
struct Args {
    /// JSONL file, one {"fen": ..., "best": ...} per line
    suite: PathBuf,
    #[arg(long, default_value_t = 4)]
    depth: u32,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 128)]
    hash_mb: usize,
    #[arg(long, default_value = "pst")]
    eval: EvalKind,
}

fn load_jsonl(path: &PathBuf) -> anyhow::Result<Vec<Rec>> {
    let rdr = BufReader::new(std::fs::File::open(path)?);
    let mut out = Vec::new();
    for line in rdr.lines() {
        let line = line?;
        let l = line.trim();
        if l.is_empty() { continue; }
        out.push(serde_json::from_str(l)?);
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cases = load_jsonl(&args.suite)?;
    anyhow::ensure!((1..=MAX_HASH_MB).contains(&args.hash_mb), "--hash-mb must be in 1..={MAX_HASH_MB}");
    let engine = Engine::new(args.eval, args.hash_mb, args.threads)?;
    let params = SearchParams { depth: args.depth, threads: args.threads.max(1), ..SearchParams::default() };

    let bar = ProgressBar::new(cases.len() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let t0 = Instant::now();
    let mut failures: Vec<String> = Vec::new();
    let mut nodes = 0u64;
    for (i, case) in cases.iter().enumerate() {
        let pos = Position::from_fen(&case.fen)?;
        engine.new_game();
        let r = engine.search(&pos, &params)?;
        nodes += r.nodes;
        let got = r.bestmove.map(|m| pos.move_to_uci(m));
        // Any mating move is accepted.
        if got.as_deref() != Some(case.best.as_str()) && r.score < MATE_SCORE {
            failures.push(format!("idx={} fen={} got={:?} expect={}", i, case.fen, got, case.best));
        }
        bar.set_message(format!("failed {}", failures.len()));
        bar.inc(1);
    }
    bar.finish();
    let secs = t0.elapsed().as_secs_f64();
    println!("summary: cases={} failed={} elapsed={:.3}s nodes={} depth={} threads={}",
        cases.len(), failures.len(), secs, nodes, args.depth, args.threads);
    if !failures.is_empty() {
        eprintln!("failures ({}):\n{}", failures.len(), failures.join("\n"));
        std::process::exit(1);
    }
    Ok(())
}
