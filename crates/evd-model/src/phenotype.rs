//! Phenotype values extracted from curated source rows.

use serde::{Deserialize, Serialize};

use crate::SourceId;

/// One input row's phenotype field together with its fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPhenotypeEntry {
    /// Original semicolon-joined phenotype text, if the row had one.
    pub source_string: Option<String>,
    /// Label used when the phenotype field carries no information
    /// (for PanelApp this is the panel name).
    pub cohort_context: String,
}

impl RawPhenotypeEntry {
    pub fn new(source_string: Option<String>, cohort_context: impl Into<String>) -> Self {
        Self {
            source_string,
            cohort_context: cohort_context.into(),
        }
    }
}

/// A single cleaned phenotype.
///
/// At least one of `label` and `source_id` is present; use [`Phenotype::new`]
/// to enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phenotype {
    pub label: Option<String>,
    pub source_id: Option<SourceId>,
}

impl Phenotype {
    /// Returns `None` when the label is blank and there is no identifier.
    pub fn new(label: Option<String>, source_id: Option<SourceId>) -> Option<Self> {
        let label = label
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if label.is_none() && source_id.is_none() {
            return None;
        }
        Some(Self { label, source_id })
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source_id(&self) -> Option<&SourceId> {
        self.source_id.as_ref()
    }

    /// Text used as `diseaseFromSource`: the label, else the identifier.
    pub fn display_name(&self) -> String {
        match (&self.label, &self.source_id) {
            (Some(label), _) => label.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        }
    }
}
