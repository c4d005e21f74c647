//! Mapping dictionary persisted between runs.
//!
//! A dictionary is a JSON file holding the resolved mapping of every term a
//! previous run looked up. Loading one seeds the [`MappingCache`] so those
//! terms are not sent to the ontology service again.
//!
//! ```json
//! { "saved_at": "2026-01-01T00:00:00Z", "version": "1.0",
//!   "mappings": { "Rett syndrome": { "queried_term": "Rett syndrome", ... } } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use evd_model::MappingResult;

use crate::cache::MappingCache;

/// Stored term → mapping table with save metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDictionary {
    /// When the dictionary was written (RFC 3339).
    #[serde(default)]
    pub saved_at: Option<String>,
    /// Version of the dictionary format.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub mappings: BTreeMap<String, MappingResult>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl MappingDictionary {
    pub fn new(mappings: BTreeMap<String, MappingResult>) -> Self {
        Self {
            saved_at: None,
            version: default_version(),
            mappings,
        }
    }

    /// Takes every resolved cache entry except `excluded` terms.
    pub fn from_cache<'a>(
        cache: &MappingCache,
        excluded: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let mut mappings = cache.snapshot();
        for term in excluded {
            mappings.remove(term);
        }
        Self::new(mappings)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Seeds `cache`; returns how many entries were new to it.
    pub fn seed(&self, cache: &MappingCache) -> usize {
        cache.preload(
            self.mappings
                .iter()
                .map(|(term, result)| (term.clone(), result.clone())),
        )
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping dictionary from {}", path.display()))?;
        let dictionary: Self = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse mapping dictionary from {}", path.display())
        })?;
        info!(path = %path.display(), entries = dictionary.len(), "loaded mapping dictionary");
        Ok(dictionary)
    }

    /// Writes the dictionary, stamping `saved_at` with the current time.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.saved_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize mapping dictionary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write mapping dictionary to {}", path.display()))?;
        info!(path = %path.display(), entries = self.len(), "saved mapping dictionary");
        Ok(())
    }
}
