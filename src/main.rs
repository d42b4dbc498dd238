use anyhow::Result;
use arbor::config::EngineConfig;
use arbor::search::eval::EvalKind;
use arbor::uci::UciEngine;
use clap::Parser;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Arbor UCI chess engine", long_about = None)]
struct Args {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads for the root split
    #[arg(long)]
    threads: Option<usize>,

    /// Transposition cache size in MB
    #[arg(long)]
    hash_mb: Option<usize>,

    /// Default search depth for 'go' without a budget
    #[arg(long)]
    depth: Option<u32>,

    /// Evaluator: pst or material
    #[arg(long)]
    eval: Option<EvalKind>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(t) = args.threads { config.threads = t; }
    if let Some(mb) = args.hash_mb { config.hash_mb = mb; }
    if let Some(d) = args.depth { config.depth = d; }
    if let Some(e) = args.eval { config.eval = e; }
    config.validate()?;
    log::info!("starting with {config:?}");

    let mut engine = UciEngine::stdio(config)?;
    engine.run_loop(io::stdin().lock())?;
    Ok(())
}
