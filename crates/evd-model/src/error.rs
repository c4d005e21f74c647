use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid source identifier: {0}")]
    InvalidSourceId(String),
    #[error("unknown ontology namespace: {0}")]
    UnknownNamespace(String),
    #[error("invalid OMIM accession '{0}': expected 6 digits")]
    InvalidOmimAccession(String),
    #[error("invalid match quality: {0}")]
    InvalidMatchQuality(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
