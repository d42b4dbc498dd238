use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use log::{error, info, warn};
use crate::board::cozy::Position;
use crate::config::{EngineConfig, MAX_HASH_MB};
use crate::error::{EngineError, UciError};
use crate::search::eval::{is_mate_score, EvalKind, Score, EVAL_LIMIT, MATE_SCORE, MAX_DEPTH};
use crate::search::root::{Engine, SearchParams, SearchResult};

pub struct UciEngine<W: Write> {
    pos: Position,
    engine: Engine<EvalKind>,
    config: EngineConfig,
    out: W,
}

impl UciEngine<io::Stdout> {
    pub fn stdio(config: EngineConfig) -> Result<Self, EngineError> { Self::new(config, io::stdout()) }
}

impl<W: Write> UciEngine<W> {
    pub fn new(config: EngineConfig, out: W) -> Result<Self, EngineError> {
        let engine = Engine::new(config.eval, config.hash_mb, config.threads)?;
        Ok(Self { pos: Position::startpos(), engine, config, out })
    }

    pub fn position(&self) -> &Position { &self.pos }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn output(&self) -> &W { &self.out }

    fn cmd_uci(&mut self) -> io::Result<()> {
        writeln!(self.out, "id name Arbor")?;
        writeln!(self.out, "id author Arbor Team")?;
        writeln!(self.out, "option name Threads type spin default {} min 1 max 512", self.config.threads)?;
        writeln!(self.out, "option name Hash type spin default {} min 1 max {}", self.config.hash_mb, MAX_HASH_MB)?;
        writeln!(self.out, "option name Depth type spin default {} min 1 max {}", self.config.depth, MAX_DEPTH)?;
        writeln!(self.out, "uciok")
    }

    fn cmd_ucinewgame(&mut self) {
        self.pos = Position::startpos();
        self.engine.new_game();
    }

    // 'position startpos [moves ...]' | 'position fen <fields> [moves ...]'
    fn cmd_position(&mut self, args: &str) -> Result<(), UciError> {
        let mut tokens = args.split_whitespace();
        let base = match tokens.next() {
            Some("startpos") => None,
            Some("fen") => {
                let fields: Vec<&str> = tokens.by_ref().take_while(|t| *t != "moves").collect();
                if fields.is_empty() { return Err(UciError::MissingArgument("fen")); }
                Some(fields.join(" "))
            }
            _ => return Err(UciError::MissingArgument("startpos or fen")),
        };
        // For startpos the 'moves' keyword is still pending; for fen take_while consumed it.
        let mut rest: Vec<String> = tokens.map(str::to_string).collect();
        if base.is_none() {
            match rest.first().map(String::as_str) {
                Some("moves") => { rest.remove(0); }
                Some(other) => return Err(UciError::UnknownCommand(other.to_string())),
                None => {}
            }
        }
        // Build aside so a bad move leaves the current position untouched.
        let pos = match base {
            Some(fen) => Position::from_fen_and_moves(&fen, &rest)?,
            None => Position::set_from_start_and_moves(&rest)?,
        };
        self.pos = pos;
        Ok(())
    }

    fn parse_go(&self, args: &str) -> Result<SearchParams, UciError> {
        let mut params = self.config.search_params();
        let mut explicit_depth = false;
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "depth" => {
                    let d: u32 = parse_number("depth", tokens.next())?;
                    params.depth = d.clamp(1, MAX_DEPTH);
                    explicit_depth = true;
                }
                "movetime" => {
                    let ms: u64 = parse_number("movetime", tokens.next())?;
                    params.movetime = Some(Duration::from_millis(ms));
                }
                // Clock-based budgets fall back to the configured depth.
                _ => {}
            }
        }
        // A bare movetime deepens until the clock runs out.
        if params.movetime.is_some() && !explicit_depth { params.depth = 0; }
        Ok(params)
    }

    fn run_go(&mut self, params: SearchParams) -> Result<(), EngineError> {
        let t0 = Instant::now();
        let res = match self.engine.search(&self.pos, &params) {
            Ok(r) => r,
            Err(e) => {
                error!("search failed: {e}");
                return Err(e.into());
            }
        };
        let ms = t0.elapsed().as_millis();
        if res.bestmove.is_some() {
            writeln!(self.out, "info depth {} score {} nodes {} time {} hashfull {}",
                res.depth, format_score(&res), res.nodes, ms, self.engine.tt().hashfull())?;
        }
        match res.bestmove {
            Some(m) => writeln!(self.out, "bestmove {}", self.pos.move_to_uci(m))?,
            None => writeln!(self.out, "bestmove 0000")?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn cmd_setoption(&mut self, args: &str) -> Result<(), UciError> {
        let after_name = args.trim().strip_prefix("name").ok_or(UciError::MissingArgument("name"))?;
        let (name, value) = after_name.split_once(" value ").ok_or(UciError::MissingArgument("value"))?;
        let name = name.trim();
        let value = Some(value.trim());
        match name.to_ascii_lowercase().as_str() {
            "threads" => {
                let t: usize = parse_number("Threads", value)?;
                let cfg = EngineConfig { threads: t, ..self.config.clone() };
                cfg.validate()?;
                if let Err(e) = self.engine.set_threads(t) {
                    warn!("could not resize worker pool: {e}");
                    return Err(UciError::UnknownOption(format!("Threads={t}")));
                }
                self.config = cfg;
            }
            "hash" => {
                let mb: usize = parse_number("Hash", value)?;
                let cfg = EngineConfig { hash_mb: mb, ..self.config.clone() };
                cfg.validate()?;
                self.engine.set_hash_mb(mb);
                self.config = cfg;
            }
            "depth" => {
                let d: u32 = parse_number("Depth", value)?;
                let cfg = EngineConfig { depth: d, ..self.config.clone() };
                cfg.validate()?;
                self.config = cfg;
            }
            _ => return Err(UciError::UnknownOption(name.to_string())),
        }
        info!("option {name} set");
        Ok(())
    }

    fn reject(&mut self, e: UciError) -> io::Result<()> {
        warn!("rejected command: {e}");
        writeln!(self.out, "info string {e}")
    }

    /// Handles one command line. Returns false when the loop should stop.
    pub fn handle_line(&mut self, line: &str) -> Result<bool, EngineError> {
        let line = line.trim();
        if line.is_empty() { return Ok(true); }
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match cmd {
            "uci" => self.cmd_uci()?,
            "isready" => writeln!(self.out, "readyok")?,
            "ucinewgame" => self.cmd_ucinewgame(),
            "quit" => return Ok(false),
            "stop" => {}
            "d" => writeln!(self.out, "{}", self.pos.fen())?,
            "position" => if let Err(e) = self.cmd_position(rest) { self.reject(e)?; },
            "setoption" => if let Err(e) = self.cmd_setoption(rest) { self.reject(e)?; },
            "go" => match self.parse_go(rest) {
                Ok(p) => self.run_go(p)?,
                Err(e) => self.reject(e)?,
            },
            other => self.reject(UciError::UnknownCommand(other.to_string()))?,
        }
        self.out.flush()?;
        Ok(true)
    }

    pub fn run_loop<R: BufRead>(&mut self, input: R) -> Result<(), EngineError> {
        for line in input.lines() {
            let line = line?;
            if !self.handle_line(&line)? { break; }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<T, UciError> {
    let v = value.ok_or(UciError::MissingArgument("number"))?;
    v.parse().map_err(|_| UciError::BadNumber { name: name.to_string(), value: v.to_string() })
}

fn format_score<M>(res: &SearchResult<M>) -> String {
    let s: Score = res.score;
    if is_mate_score(s) && res.depth > 0 {
        // Dated by remaining depth at the mated node; convert to plies from the root.
        let remaining = (s.abs() - MATE_SCORE) as u32;
        let plies = res.depth.saturating_sub(remaining);
        if s > 0 { format!("mate {}", (plies + 1) / 2) } else { format!("mate -{}", plies / 2) }
    } else {
        // Without a completed depth a mate cannot be dated; report it as a bounded cp.
        format!("cp {}", s.clamp(-EVAL_LIMIT, EVAL_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: Score, depth: u32) -> SearchResult<()> {
        SearchResult { bestmove: Some(()), score, depth, nodes: 0, completed: true }
    }

    #[test]
    fn mate_scores_convert_to_moves() {
        // Mated node one ply below a depth-3 root has two plies remaining.
        assert_eq!(format_score(&result(MATE_SCORE + 2, 3)), "mate 1");
        assert_eq!(format_score(&result(MATE_SCORE, 3)), "mate 2");
        assert_eq!(format_score(&result(-MATE_SCORE - 2, 4)), "mate -1");
        assert_eq!(format_score(&result(35, 4)), "cp 35");
    }

    #[test]
    fn undated_mate_is_reported_as_bounded_cp() {
        assert_eq!(format_score(&result(MATE_SCORE + 3, 0)), format!("cp {EVAL_LIMIT}"));
        assert_eq!(format_score(&result(-MATE_SCORE - 1, 0)), format!("cp -{EVAL_LIMIT}"));
    }
}
