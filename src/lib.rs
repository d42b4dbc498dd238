// Root-parallel alpha-beta chess engine
pub mod board;
pub mod config;
pub mod error;
pub mod perft;
pub mod search;
pub mod selfplay;
pub mod uci;
