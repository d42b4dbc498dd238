use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};
use crate::board::{Rules, Status};
use crate::error::BoardError;
use crate::search::eval::MAX_DEPTH;

const FIFTY_MOVE_PLIES: u32 = 100;

/// Cozy-chess board plus the undo stack needed for in-place make/unmake.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    stack: Vec<CozyBoard>,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), stack: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b, stack: Vec::with_capacity(128) })
            .map_err(|e| BoardError::BadFen(format!("{fen}: {e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// Long algebraic text for `mv`; castling is shown as the king's
    /// two-square step rather than cozy-chess's king-takes-rook encoding.
    pub fn move_to_uci(&self, mv: Move) -> String {
        let mut shown = mv;
        let stm = self.board.side_to_move();
        if self.board.piece_on(mv.from) == Some(Piece::King) && self.board.color_on(mv.to) == Some(stm) {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
            shown.to = Square::new(file, mv.from.rank());
        }
        format!("{}", shown)
    }

    pub fn parse_uci(&self, text: &str) -> Result<Move, BoardError> {
        self.legal_moves()
            .into_iter()
            .find(|&m| self.move_to_uci(m) == text || format!("{}", m) == text)
            .ok_or_else(|| BoardError::IllegalMove(text.to_string()))
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), BoardError> {
        let m = self.parse_uci(mv_uci)?;
        self.make_move(m);
        Ok(())
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn from_fen_and_moves(fen: &str, moves: &[String]) -> Result<Self, BoardError> {
        let mut pos = Self::from_fen(fen)?;
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    fn has_legal_move(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|ml| { any = !ml.is_empty(); any });
        any
    }
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Rules for Position {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    fn make_move(&mut self, mv: Move) {
        self.stack.push(self.board.clone());
        self.board.play_unchecked(mv);
    }

    fn unmake_move(&mut self, _mv: Move) {
        if let Some(prev) = self.stack.pop() { self.board = prev; }
    }

    fn status(&self) -> Status {
        if !self.has_legal_move() {
            return if self.board.checkers().is_empty() { Status::Stalemate } else { Status::Checkmate };
        }
        if self.board.halfmove_clock() as u32 >= FIFTY_MOVE_PLIES || insufficient_material(&self.board) {
            return Status::Draw;
        }
        Status::Ongoing
    }

    fn identity(&self) -> u64 {
        let key = self.board.hash();
        // The clock only matters once the fifty-move draw is reachable inside the horizon.
        let clock = self.board.halfmove_clock() as u32;
        if clock + MAX_DEPTH >= FIFTY_MOVE_PLIES { key ^ splitmix64(clock as u64) } else { key }
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Dead positions: bare kings, a single minor piece, or bishops that all
/// stand on one square colour.
pub fn insufficient_material(board: &CozyBoard) -> bool {
    let heavy = board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if !heavy.is_empty() { return false; }
    let knights = board.pieces(Piece::Knight);
    let bishops = board.pieces(Piece::Bishop);
    let minors = (knights | bishops).into_iter().count();
    if minors <= 1 { return true; }
    if !knights.is_empty() { return false; }
    let mut dark = 0usize;
    let mut light = 0usize;
    for sq in bishops {
        if (sq.rank() as usize + sq.file() as usize) % 2 == 0 { dark += 1; } else { light += 1; }
    }
    dark == 0 || light == 0
}
