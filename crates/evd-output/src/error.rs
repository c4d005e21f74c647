//! Error types for evidence output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write evidence: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to serialize evidence record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to move output into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
