pub mod cozy;

use std::fmt::Debug;

/// Game-state classification reported by a rules backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    /// The side to move is checkmated.
    Checkmate,
    Stalemate,
    /// Any other drawn state (insufficient material, fifty-move rule).
    Draw,
}

/// Capability interface the search consumes. The search never looks at
/// pieces or squares; everything goes through these operations.
pub trait Rules: Clone + Send + Sync {
    type Move: Copy + Eq + Debug + Send + Sync;

    /// Legal moves in a deterministic order for equal positions.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, mv: Self::Move);

    /// Exact inverse of the most recent `make_move(mv)`.
    fn unmake_move(&mut self, mv: Self::Move);

    fn status(&self) -> Status;

    fn is_game_over(&self) -> bool { self.status() != Status::Ongoing }

    /// Cache key: equal for positions that score identically, including side
    /// to move and castling/en-passant rights.
    fn identity(&self) -> u64;
}
