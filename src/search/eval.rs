use cozy_chess::{Board, Color, Piece};
use crate::board::cozy::Position;
use crate::board::{Rules, Status};

pub type Score = i32;

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;
const KING: i32 = 20_000;

// Mate scoring helpers
pub const MATE_SCORE: Score = 30_000;
pub const DRAW_SCORE: Score = 0;
/// Deepest supported search, in plies.
pub const MAX_DEPTH: u32 = 64;
/// Strictly outside every dated mate score; full-width search bounds.
pub const INFINITY: Score = MATE_SCORE + MAX_DEPTH as i32 + 1;
/// Non-terminal evaluations never leave [-EVAL_LIMIT, EVAL_LIMIT].
pub const EVAL_LIMIT: Score = MATE_SCORE - 1;

pub fn is_mate_score(score: Score) -> bool { score.abs() >= MATE_SCORE }

/// Date an undated terminal score by remaining depth so that mates found
/// nearer the root are more extreme. Non-terminal scores pass through.
pub fn date_terminal(score: Score, depth: u32) -> Score {
    if score <= -MATE_SCORE { -MATE_SCORE - depth as i32 }
    else if score >= MATE_SCORE { MATE_SCORE + depth as i32 }
    else { score }
}

/// Position evaluator. Scores are from the side to move's perspective.
pub trait Evaluator<P>: Send + Sync {
    fn evaluate(&self, pos: &P) -> Score;
}

// Piece-square tables, written rank 8 first from White's point of view.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => KING,
    }
}

fn pst(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_PST,
    }
}

/// Bonus for `piece` of `color` on the square at `rank`/`file` (0-based from a1).
pub fn positional_bonus(piece: Piece, color: Color, rank: usize, file: usize) -> i32 {
    let row = if color == Color::White { 7 - rank } else { rank };
    pst(piece)[row * 8 + file]
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.into_iter().count() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    PIECES.iter().map(|&p| {
        (count_piece(board, Color::White, p) - count_piece(board, Color::Black, p)) * piece_value(p)
    }).sum()
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(board: &Board) -> i32 {
    let base = material_eval_cp_side_agnostic(board);
    if board.side_to_move() == Color::White { base } else { -base }
}

/// Material plus piece-square bonus for every occupied square, from the side
/// to move's perspective. Ignores terminal states.
pub fn pst_eval_cp(board: &Board) -> i32 {
    let stm = board.side_to_move();
    let mut score = 0;
    for &color in &[Color::White, Color::Black] {
        let sign = if color == stm { 1 } else { -1 };
        for &piece in &PIECES {
            for sq in board.colors(color) & board.pieces(piece) {
                let v = piece_value(piece) + positional_bonus(piece, color, sq.rank() as usize, sq.file() as usize);
                score += sign * v;
            }
        }
    }
    score
}

fn terminal_score(pos: &Position) -> Option<Score> {
    match pos.status() {
        Status::Checkmate => Some(-MATE_SCORE),
        Status::Stalemate | Status::Draw => Some(DRAW_SCORE),
        Status::Ongoing => None,
    }
}

/// Material and piece-square tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct PstEvaluator;

impl Evaluator<Position> for PstEvaluator {
    fn evaluate(&self, pos: &Position) -> Score {
        terminal_score(pos).unwrap_or_else(|| pst_eval_cp(pos.board()).clamp(-EVAL_LIMIT, EVAL_LIMIT))
    }
}

/// Material only; terminal states are still scored.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator<Position> for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> Score {
        terminal_score(pos).unwrap_or_else(|| material_eval_cp(pos.board()).clamp(-EVAL_LIMIT, EVAL_LIMIT))
    }
}

/// Runtime-selectable evaluator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalKind {
    #[default]
    Pst,
    Material,
}

impl std::str::FromStr for EvalKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pst" => Ok(EvalKind::Pst),
            "material" => Ok(EvalKind::Material),
            other => Err(format!("unknown evaluator '{other}' (expected pst or material)")),
        }
    }
}

impl Evaluator<Position> for EvalKind {
    fn evaluate(&self, pos: &Position) -> Score {
        match self {
            EvalKind::Pst => PstEvaluator.evaluate(pos),
            EvalKind::Material => MaterialEvaluator.evaluate(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_mirrored_between_colours() {
        for piece in PIECES {
            for rank in 0..8 {
                for file in 0..8 {
                    assert_eq!(
                        positional_bonus(piece, Color::White, rank, file),
                        positional_bonus(piece, Color::Black, 7 - rank, file),
                    );
                }
            }
        }
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(pst_eval_cp(&Board::default()), 0);
    }

    #[test]
    fn dating_orders_mates_by_distance() {
        assert!(date_terminal(-MATE_SCORE, 3) < date_terminal(-MATE_SCORE, 1));
        assert!(date_terminal(MATE_SCORE, 3) > date_terminal(MATE_SCORE, 1));
        assert_eq!(date_terminal(150, 5), 150);
        assert!(date_terminal(-MATE_SCORE, MAX_DEPTH) > -INFINITY);
    }
}
