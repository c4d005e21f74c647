//! ClinGen gene validity curations (comma-separated download).
//!
//! The download opens with a banner: a title, the creation date, the source
//! web page and a `+++` rule. The column header follows, then another rule,
//! then one curation per line.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, warn};

use evd_model::{Namespace, Phenotype, SourceId};

use crate::error::{IngestError, Result};

/// Columns the curation table must provide.
pub const CLINGEN_COLUMNS: [&str; 6] = [
    "GENE SYMBOL",
    "DISEASE LABEL",
    "DISEASE ID (MONDO)",
    "MOI",
    "CLASSIFICATION",
    "GCEP",
];

/// One gene-disease validity curation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClinGenRow {
    #[serde(rename = "GENE SYMBOL")]
    pub gene_symbol: String,
    #[serde(rename = "DISEASE LABEL")]
    pub disease_label: String,
    /// MONDO identifier, `MONDO:0007739` or `MONDO_0007739`.
    #[serde(rename = "DISEASE ID (MONDO)")]
    pub disease_id: String,
    #[serde(rename = "MOI", default)]
    pub mode_of_inheritance: Option<String>,
    /// Validity classification, e.g. `Definitive` or `Disputed`.
    #[serde(rename = "CLASSIFICATION")]
    pub classification: String,
    /// Gene curation expert panel.
    #[serde(rename = "GCEP")]
    pub expert_panel: String,
    #[serde(rename = "ONLINE REPORT", default)]
    pub online_report: Option<String>,
}

impl ClinGenRow {
    /// The curated MONDO id, if it parses as one.
    pub fn mondo_id(&self) -> Option<SourceId> {
        match SourceId::parse(&self.disease_id) {
            Ok(id) if id.namespace() == Namespace::Mondo => Some(id),
            Ok(id) => {
                warn!(gene = %self.gene_symbol, id = %id, "disease id is not a MONDO id");
                None
            }
            Err(err) => {
                warn!(gene = %self.gene_symbol, error = %err, "unreadable disease id");
                None
            }
        }
    }

    /// The disease as a phenotype: curated label plus MONDO id.
    pub fn to_phenotype(&self) -> Option<Phenotype> {
        Phenotype::new(Some(self.disease_label.clone()), self.mondo_id())
    }
}

/// Reads every curation of a ClinGen download.
pub fn read_clingen(path: &Path) -> Result<Vec<ClinGenRow>> {
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
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut headers: Option<StringRecord> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        if is_rule(&record) {
            continue;
        }
        if let Some(headers) = &headers {
            let row: ClinGenRow = record.deserialize(Some(headers)).map_err(parse_error)?;
            rows.push(row);
        } else if record.iter().any(|field| field == CLINGEN_COLUMNS[0]) {
            check_columns(&record, path)?;
            headers = Some(record);
        }
    }

    if headers.is_none() {
        return Err(IngestError::MissingColumn {
            column: CLINGEN_COLUMNS[0].to_string(),
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), rows = rows.len(), "read ClinGen curations");
    Ok(rows)
}

fn is_rule(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| !field.is_empty() && field.chars().all(|ch| ch == '+'))
}

fn check_columns(header: &StringRecord, path: &Path) -> Result<()> {
    for column in CLINGEN_COLUMNS {
        if !header.iter().any(|field| field == column) {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(disease_id: &str) -> ClinGenRow {
        ClinGenRow {
            gene_symbol: "HTT".to_string(),
            disease_label: "Huntington disease".to_string(),
            disease_id: disease_id.to_string(),
            mode_of_inheritance: Some("AD".to_string()),
            classification: "Definitive".to_string(),
            expert_panel: "Huntington Disease GCEP".to_string(),
            online_report: None,
        }
    }

    #[test]
    fn accepts_both_mondo_spellings() {
        assert_eq!(
            row("MONDO:0007739").mondo_id().map(|id| id.to_string()).as_deref(),
            Some("MONDO:0007739")
        );
        assert_eq!(
            row("MONDO_0007739").mondo_id().map(|id| id.to_string()).as_deref(),
            Some("MONDO:0007739")
        );
    }

    #[test]
    fn other_ids_keep_only_the_label() {
        let phenotype = row("OMIM:143100").to_phenotype().unwrap();
        assert_eq!(phenotype.label(), Some("Huntington disease"));
        assert!(phenotype.source_id().is_none());
        assert!(row("").mondo_id().is_none());
    }
}
