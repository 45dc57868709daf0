//! Error type shared by the session modules
//!
//! Nothing here is recoverable: every variant ends the run.

use std::path::PathBuf;
use thiserror::Error;

use super::block::Stage;

/// Everything that can stop a recording session
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("failed to read word list {}: {source}", path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list {} contains no words", .0.display())]
    EmptyWordList(PathBuf),

    #[error("{stage} pool has {available} items but a block needs {needed}")]
    PoolTooSmall {
        stage: Stage,
        needed: usize,
        available: usize,
    },

    #[error("block needs {targets} targets but only {trials} trials")]
    InvalidBlockSize { targets: usize, trials: usize },

    #[error("{field} of {secs} seconds is not a usable duration")]
    InvalidDuration { field: &'static str, secs: f64 },

    #[error("invalid protocol config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("session aborted by operator")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, ExperimentError>;
