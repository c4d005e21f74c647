//! PanelApp gene-panel export (tab-separated).
//!
//! Only the columns below are read; any other column is ignored. A row is
//! kept when it is on the green or amber list of a public panel whose
//! version is greater than 1.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use evd_model::RawPhenotypeEntry;

use crate::error::{IngestError, Result};

/// Columns the export must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Symbol",
    "Panel Id",
    "Panel Name",
    "Panel Version",
    "Panel Status",
    "List",
    "Mode of inheritance",
    "Phenotypes",
];

/// One gene-panel row of the export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanelAppRow {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Panel Id")]
    pub panel_id: String,
    #[serde(rename = "Panel Name")]
    pub panel_name: String,
    #[serde(rename = "Panel Version")]
    pub panel_version: String,
    #[serde(rename = "Panel Status")]
    pub panel_status: String,
    /// Confidence list: `green`, `amber` or `red`.
    #[serde(rename = "List")]
    pub list: String,
    #[serde(rename = "Mode of inheritance", default)]
    pub mode_of_inheritance: Option<String>,
    #[serde(rename = "Phenotypes", default)]
    pub phenotypes: Option<String>,
}

impl PanelAppRow {
    pub fn passes_filter(&self) -> bool {
        let confident = matches!(self.list.as_str(), "green" | "amber");
        let released = self
            .panel_version
            .parse::<f64>()
            .is_ok_and(|version| version > 1.0);
        confident && released && self.panel_status == "PUBLIC"
    }

    /// Phenotype field with the panel name as its fallback label.
    pub fn to_entry(&self) -> RawPhenotypeEntry {
        RawPhenotypeEntry::new(
            self.phenotypes.clone().filter(|value| !value.trim().is_empty()),
            self.panel_name.clone(),
        )
    }

    pub fn allelic_requirement(&self) -> Option<&str> {
        self.mode_of_inheritance
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Reads every row of a PanelApp export.
pub fn read_panelapp(path: &Path) -> Result<Vec<PanelAppRow>> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |err: csv::Error| IngestError::TableParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(parse_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header.trim_matches('\u{feff}') == column) {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let rows = reader
        .deserialize::<PanelAppRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(parse_error)?;
    debug!(path = %path.display(), rows = rows.len(), "read PanelApp export");
    Ok(rows)
}
