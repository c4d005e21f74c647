//! Configuration options for phenotype normalization.

use serde::{Deserialize, Serialize};

/// Phenotype fields that carry no information and trigger the cohort fallback.
pub const DEFAULT_PLACEHOLDERS: &[&str] = &["No OMIM phenotype"];

/// Options for phenotype normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerOptions {
    /// Whole-field values treated like a missing phenotype.
    /// Compared case-insensitively after trimming.
    pub placeholders: Vec<String>,

    /// Drop fragments whose label starts with `?`.
    /// Default: true (the source marks uncertain phenotypes this way).
    pub drop_uncertain: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            placeholders: DEFAULT_PLACEHOLDERS
                .iter()
                .map(|value| (*value).to_string())
                .collect(),
            drop_uncertain: true,
        }
    }
}

impl NormalizerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholders.push(placeholder.into());
        self
    }

    pub fn with_drop_uncertain(mut self, enable: bool) -> Self {
        self.drop_uncertain = enable;
        self
    }

    /// Returns true if `value` is blank or one of the placeholders.
    pub fn is_placeholder(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || self
                .placeholders
                .iter()
                .any(|placeholder| placeholder.trim().eq_ignore_ascii_case(trimmed))
    }
}
