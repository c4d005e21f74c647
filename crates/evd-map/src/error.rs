//! Error types for ontology lookups.

use thiserror::Error;

/// Errors raised by an [`OntologyLookup`](crate::OntologyLookup) backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// Transport failure (connection refused, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The service asked us to slow down.
    #[error("ontology service rate limit exceeded")]
    RateLimited,

    /// The service answered with a non-success status.
    #[error("ontology service returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid lookup response: {0}")]
    InvalidResponse(String),

    /// A local lookup table is malformed.
    #[error("lookup table error: {0}")]
    Table(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl LookupError {
    /// Returns whether the same query may succeed when sent again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited => true,
            Self::Service { status, .. } => *status >= 500,
            Self::InvalidResponse(_) | Self::Table(_) | Self::Io(_) => false,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for LookupError {
    fn from(err: csv::Error) -> Self {
        Self::Table(err.to_string())
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(LookupError::Network("timeout".to_string()).is_retryable());
        assert!(LookupError::RateLimited.is_retryable());
        assert!(
            LookupError::Service {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            !LookupError::Service {
                status: 400,
                message: "bad query".to_string()
            }
            .is_retryable()
        );
        assert!(!LookupError::InvalidResponse("eof".to_string()).is_retryable());
    }
}
