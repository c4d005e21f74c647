//! The ontology lookup capability and its backends.

mod ols;
mod table;

pub use ols::{DEFAULT_OLS_URL, OlsLookup};
pub use table::TableLookup;

use evd_model::{MappingResult, MatchQuality};

use crate::error::Result;

/// A term returned by an ontology lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupHit {
    /// Ontology term as a CURIE or IRI.
    pub term: String,
    pub label: Option<String>,
    pub source: Option<String>,
    /// `None` is treated as unmatched.
    pub quality: Option<MatchQuality>,
}

impl LookupHit {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            label: None,
            source: None,
            quality: None,
        }
    }

    /// A hit of quality `match`.
    pub fn matched(term: impl Into<String>) -> Self {
        Self::new(term).with_quality(MatchQuality::Match)
    }

    /// A hit of quality `fuzzy`.
    pub fn fuzzy(term: impl Into<String>) -> Self {
        Self::new(term).with_quality(MatchQuality::Fuzzy)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_quality(mut self, quality: MatchQuality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn into_result(self, queried_term: &str) -> MappingResult {
        MappingResult {
            queried_term: queried_term.to_string(),
            ontology_term: Some(self.term),
            ontology_label: self.label,
            match_quality: self.quality.unwrap_or_default(),
            source: self.source,
            corroborated: false,
        }
    }
}

/// Resolves free text or a structured identifier to an ontology term.
///
/// `Ok(None)` means the service knows nothing about the text. Any
/// `Fn(&str) -> Result<Option<LookupHit>>` is a lookup.
pub trait OntologyLookup {
    fn find_term(&self, text: &str) -> Result<Option<LookupHit>>;
}

impl<F> OntologyLookup for F
where
    F: Fn(&str) -> Result<Option<LookupHit>>,
{
    fn find_term(&self, text: &str) -> Result<Option<LookupHit>> {
        self(text)
    }
}
