//! Lookup backed by a local tab-separated table.
//!
//! Header columns: `query`, `term`, and optionally `label`, `quality`
//! (`match`/`fuzzy`, default `match`) and `source`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use evd_model::MatchQuality;

use super::{LookupHit, OntologyLookup};
use crate::error::{LookupError, Result};

#[derive(Debug, Deserialize)]
struct TableRow {
    query: String,
    term: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// In-memory lookup table keyed on the trimmed, lowercased query text.
#[derive(Debug, Clone, Default)]
pub struct TableLookup {
    entries: HashMap<String, LookupHit>,
}

impl TableLookup {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            LookupError::Io(format!("failed to open {}: {err}", path.display()))
        })?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), entries = table.len(), "loaded lookup table");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for row in reader.deserialize::<TableRow>() {
            let row = row?;
            let quality = match row.quality.as_deref().filter(|value| !value.is_empty()) {
                Some(value) => value
                    .parse::<MatchQuality>()
                    .map_err(|err| LookupError::Table(err.to_string()))?,
                None => MatchQuality::Match,
            };
            let mut hit = LookupHit::new(row.term).with_quality(quality);
            hit.label = row.label.filter(|value| !value.is_empty());
            hit.source = row.source.filter(|value| !value.is_empty());
            table.insert(&row.query, hit);
        }
        Ok(table)
    }

    /// Adds or replaces the entry for `query`.
    pub fn insert(&mut self, query: &str, hit: LookupHit) {
        self.entries.insert(table_key(query), hit);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OntologyLookup for TableLookup {
    fn find_term(&self, text: &str) -> Result<Option<LookupHit>> {
        Ok(self.entries.get(&table_key(text)).cloned())
    }
}

fn table_key(text: &str) -> String {
    text.trim().to_lowercase()
}
