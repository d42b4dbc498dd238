use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::search::eval::{EvalKind, MAX_DEPTH};
use crate::search::root::SearchParams;

/// Largest transposition cache accepted from any configuration layer.
pub const MAX_HASH_MB: usize = 16_384;

/// Engine-wide settings. Layered: JSON file, then CLI flags, then UCI
/// `setoption` at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub threads: usize,
    pub hash_mb: usize,
    pub depth: u32,
    pub use_tt: bool,
    pub use_pruning: bool,
    pub eval: EvalKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            hash_mb: 64,
            depth: 5,
            use_tt: true,
            use_pruning: true,
            eval: EvalKind::Pst,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1".into()));
        }
        if self.hash_mb == 0 || self.hash_mb > MAX_HASH_MB {
            return Err(ConfigError::Invalid(format!("hash_mb must be in 1..={MAX_HASH_MB}, got {}", self.hash_mb)));
        }
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::Invalid(format!("depth must be in 1..={MAX_DEPTH}, got {}", self.depth)));
        }
        Ok(())
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            depth: self.depth,
            threads: self.threads,
            movetime: None,
            use_tt: self.use_tt,
            use_pruning: self.use_pruning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"depth": 3, "eval": "material"}"#).unwrap();
        assert_eq!(cfg.depth, 3);
        assert_eq!(cfg.eval, EvalKind::Material);
        assert_eq!(cfg.hash_mb, 64);
        assert!(cfg.use_pruning);
    }

    #[test]
    fn rejects_zero_threads_and_excess_depth() {
        let mut cfg = EngineConfig { threads: 0, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
        cfg.threads = 2;
        cfg.depth = MAX_DEPTH + 1;
        assert!(cfg.validate().is_err());
        cfg.depth = 4;
        assert!(cfg.validate().is_ok());
        cfg.hash_mb = 0;
        assert!(cfg.validate().is_err());
        cfg.hash_mb = MAX_HASH_MB + 1;
        assert!(cfg.validate().is_err());
    }
}
