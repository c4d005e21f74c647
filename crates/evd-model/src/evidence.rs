use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Data source identifier written into every PanelApp evidence record.
pub const GENOMICS_ENGLAND_DATASOURCE: &str = "genomics_england";

/// Data source identifier of ClinGen gene validity records.
pub const CLINGEN_DATASOURCE: &str = "clingen";

/// Data type identifier shared by the PanelApp and ClinGen records.
pub const GENETIC_LITERATURE_DATATYPE: &str = "genetic_literature";

/// Key fields of an [`EvidenceRecord`]: study, target, disease label,
/// source id and mapped id.
pub type DedupeKey = (String, String, String, Option<String>, Option<String>);

/// A link to the curation report behind a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceUrl {
    pub url: String,
}

/// One gene–disease evidence record, serialized as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub datasource_id: String,
    pub datatype_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    pub disease_from_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease_from_source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease_from_source_mapped_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cohort_phenotypes: Vec<String>,
    pub target_from_source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allelic_requirements: Option<Vec<String>>,
    pub study_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_overview: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub literature: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<EvidenceUrl>,
}

impl EvidenceRecord {
    /// Composite key used to drop duplicate records.
    pub fn dedupe_key(&self) -> DedupeKey {
        (
            self.study_id.clone(),
            self.target_from_source_id.clone(),
            self.disease_from_source.clone(),
            self.disease_from_source_id.clone(),
            self.disease_from_source_mapped_id.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(study_id: &str, target: &str) -> EvidenceRecord {
        EvidenceRecord {
            datasource_id: GENOMICS_ENGLAND_DATASOURCE.to_string(),
            datatype_id: GENETIC_LITERATURE_DATATYPE.to_string(),
            confidence: None,
            disease_from_source: "Rett syndrome".to_string(),
            disease_from_source_id: None,
            disease_from_source_mapped_id: None,
            cohort_phenotypes: vec![],
            target_from_source_id: target.to_string(),
            allelic_requirements: None,
            study_id: study_id.to_string(),
            study_overview: None,
            literature: BTreeSet::new(),
            urls: vec![],
        }
    }

    #[test]
    fn dedupe_key_separates_fields_containing_pipes() {
        assert_ne!(
            record("245|MECP2", "X").dedupe_key(),
            record("245", "MECP2|X").dedupe_key()
        );
        assert_eq!(record("245", "MECP2").dedupe_key(), record("245", "MECP2").dedupe_key());
    }

    #[test]
    fn missing_and_empty_ids_differ() {
        let mut with_empty = record("245", "MECP2");
        with_empty.disease_from_source_id = Some(String::new());
        assert_ne!(with_empty.dedupe_key(), record("245", "MECP2").dedupe_key());
    }
}
