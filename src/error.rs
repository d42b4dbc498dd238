use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The rules backend reported an ongoing game but produced no moves.
    #[error("rules contract violated: no legal moves at a non-terminal position (key {key:#018x}, depth {depth})")]
    EmptyMoveList { key: u64, depth: u32 },
    #[error("search aborted at deadline")]
    Aborted,
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid FEN {0}")]
    BadFen(String),
    #[error("illegal or unparseable move '{0}'")]
    IllegalMove(String),
}

#[derive(Debug, Error)]
pub enum UciError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("expected a number for '{name}', got '{value}'")]
    BadNumber { name: String, value: String },
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that end the protocol loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
}
