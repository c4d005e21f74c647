//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading source data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Errors ===
    /// Malformed row or header.
    #[error("failed to parse {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    /// Required column not found in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === API Errors ===
    /// Transport failure talking to the source API.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API request {url} failed with HTTP {status}")]
    Api { url: String, status: u16 },

    /// The API response could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
