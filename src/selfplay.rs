use cozy_chess::Color;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use crate::board::cozy::Position;
use crate::board::{Rules, Status};
use crate::error::SearchError;
use crate::search::eval::Evaluator;
use crate::search::root::{Engine, SearchParams};

/// How the side not played by the engine chooses its moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opponent {
    /// Always the first legal move in enumeration order.
    FirstLegal,
    /// Uniformly random legal move from a seeded generator.
    Random(u64),
    /// The engine plays both sides.
    Engine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Stopped at the ply cap.
    Unfinished,
}

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub engine_color: Color,
    pub opponent: Opponent,
    pub search: SearchParams,
    pub max_plies: usize,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        Self { engine_color: Color::White, opponent: Opponent::FirstLegal, search: SearchParams::default(), max_plies: 200 }
    }
}

pub struct GameRecord {
    pub moves: Vec<String>,
    pub result: GameResult,
}

/// Plays one game from `start` until it ends or `max_plies` is reached.
pub fn play_game<E>(engine: &Engine<E>, start: Position, params: &SelfPlayParams) -> Result<GameRecord, SearchError>
where
    E: Evaluator<Position>,
{
    let mut pos = start;
    let mut rng = match params.opponent {
        Opponent::Random(seed) => SmallRng::seed_from_u64(seed),
        _ => SmallRng::seed_from_u64(0),
    };
    let mut record = GameRecord { moves: Vec::new(), result: GameResult::Unfinished };
    while record.moves.len() < params.max_plies && !pos.is_game_over() {
        let engine_turn = params.opponent == Opponent::Engine || pos.side_to_move() == params.engine_color;
        let mv = if engine_turn {
            engine.search(&pos, &params.search)?.bestmove
        } else {
            let moves = pos.legal_moves();
            match params.opponent {
                Opponent::Random(_) if !moves.is_empty() => Some(moves[rng.gen_range(0..moves.len())]),
                _ => moves.first().copied(),
            }
        };
        let Some(mv) = mv else { break };
        let text = pos.move_to_uci(mv);
        debug!("ply {} {}", record.moves.len() + 1, text);
        record.moves.push(text);
        pos.make_move(mv);
    }
    // The cap may land on a finished game.
    record.result = classify(&pos);
    Ok(record)
}

fn classify(pos: &Position) -> GameResult {
    match pos.status() {
        Status::Ongoing => GameResult::Unfinished,
        Status::Checkmate if pos.side_to_move() == Color::White => GameResult::BlackWins,
        Status::Checkmate => GameResult::WhiteWins,
        Status::Stalemate | Status::Draw => GameResult::Draw,
    }
}
