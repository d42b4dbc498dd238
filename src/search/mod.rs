pub mod alphabeta;
pub mod eval;
pub mod root;
pub mod tt;
