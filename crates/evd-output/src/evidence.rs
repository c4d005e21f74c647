//! Evidence record assembly and de-duplication.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use evd_ingest::{ClinGenRow, PanelAppRow};
use evd_model::{
    CLINGEN_DATASOURCE, EvidenceRecord, EvidenceUrl, GENETIC_LITERATURE_DATATYPE,
    GENOMICS_ENGLAND_DATASOURCE, MappingPolicy, Phenotype, ReconciledMapping,
};

/// Namespace-stripped ontology id of a mapping the policy accepts.
pub fn accepted_mapped_id(mapping: &ReconciledMapping, policy: MappingPolicy) -> Option<String> {
    if mapping.is_accepted(policy) {
        mapping.mapping.mapped_id()
    } else {
        None
    }
}

/// Builds the record for one (row, phenotype) pair.
pub fn build_evidence(
    row: &PanelAppRow,
    phenotype: &Phenotype,
    cohort_phenotypes: &[String],
    mapped_id: Option<String>,
    literature: Option<&BTreeSet<String>>,
) -> EvidenceRecord {
    EvidenceRecord {
        datasource_id: GENOMICS_ENGLAND_DATASOURCE.to_string(),
        datatype_id: GENETIC_LITERATURE_DATATYPE.to_string(),
        confidence: Some(row.list.clone()).filter(|value| !value.is_empty()),
        disease_from_source: phenotype.display_name(),
        disease_from_source_id: phenotype.source_id().map(ToString::to_string),
        disease_from_source_mapped_id: mapped_id,
        cohort_phenotypes: cohort_phenotypes.to_vec(),
        target_from_source_id: row.symbol.clone(),
        allelic_requirements: row
            .allelic_requirement()
            .map(|requirement| vec![requirement.to_string()]),
        study_id: row.panel_id.clone(),
        study_overview: Some(row.panel_name.clone()).filter(|value| !value.is_empty()),
        literature: literature.cloned().unwrap_or_default(),
        urls: Vec::new(),
    }
}

/// Builds the record for one ClinGen curation and one mapped term.
pub fn build_clingen_evidence(row: &ClinGenRow, mapped_id: Option<String>) -> EvidenceRecord {
    EvidenceRecord {
        datasource_id: CLINGEN_DATASOURCE.to_string(),
        datatype_id: GENETIC_LITERATURE_DATATYPE.to_string(),
        confidence: non_empty(&row.classification),
        disease_from_source: row.disease_label.clone(),
        disease_from_source_id: non_empty(&row.disease_id),
        disease_from_source_mapped_id: mapped_id,
        cohort_phenotypes: Vec::new(),
        target_from_source_id: row.gene_symbol.trim_end().to_string(),
        allelic_requirements: row
            .mode_of_inheritance
            .as_deref()
            .and_then(non_empty)
            .map(|requirement| vec![requirement]),
        study_id: row.expert_panel.clone(),
        study_overview: None,
        literature: BTreeSet::new(),
        urls: row
            .online_report
            .as_deref()
            .and_then(non_empty)
            .map(|url| EvidenceUrl { url })
            .into_iter()
            .collect(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Drops records whose key fields repeat an earlier record, keeping order.
pub fn dedupe_evidence(records: Vec<EvidenceRecord>) -> Vec<EvidenceRecord> {
    let total = records.len();
    let mut seen = HashSet::new();
    let kept: Vec<EvidenceRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.dedupe_key()))
        .collect();
    if kept.len() < total {
        debug!(dropped = total - kept.len(), "removed duplicate evidence records");
    }
    kept
}

#[cfg(test)]
mod tests {
    use evd_model::{MappingResult, MappingRoute, MatchQuality, SourceId};

    use super::*;

    fn row() -> PanelAppRow {
        PanelAppRow {
            symbol: "FGD1".to_string(),
            panel_id: "285".to_string(),
            panel_name: "Intellectual disability".to_string(),
            panel_version: "2.5".to_string(),
            panel_status: "PUBLIC".to_string(),
            list: "green".to_string(),
            mode_of_inheritance: Some("X-LINKED".to_string()),
            phenotypes: Some("Aarskog-Scott syndrome, 305400".to_string()),
        }
    }

    fn phenotype() -> Phenotype {
        Phenotype::new(
            Some("Aarskog-Scott syndrome".to_string()),
            Some(SourceId::omim("305400").unwrap()),
        )
        .unwrap()
    }

    fn reconciled(quality: MatchQuality) -> ReconciledMapping {
        ReconciledMapping {
            phenotype: phenotype(),
            mapping: MappingResult {
                queried_term: "Aarskog-Scott syndrome".to_string(),
                ontology_term: Some("http://www.orpha.net/ORDO/Orphanet_915".to_string()),
                ontology_label: None,
                match_quality: quality,
                source: None,
                corroborated: false,
            },
            route: MappingRoute::Label,
        }
    }

    #[test]
    fn mapped_id_respects_policy() {
        assert_eq!(
            accepted_mapped_id(&reconciled(MatchQuality::Match), MappingPolicy::MatchOnly)
                .as_deref(),
            Some("Orphanet_915")
        );
        assert_eq!(
            accepted_mapped_id(&reconciled(MatchQuality::Fuzzy), MappingPolicy::MatchOnly),
            None
        );
        assert!(
            accepted_mapped_id(&reconciled(MatchQuality::Fuzzy), MappingPolicy::KeepFuzzy)
                .is_some()
        );
    }

    #[test]
    fn record_fields_come_from_row_and_phenotype() {
        let record = build_evidence(&row(), &phenotype(), &[], None, None);
        assert_eq!(record.confidence.as_deref(), Some("green"));
        assert_eq!(record.disease_from_source_id.as_deref(), Some("OMIM:305400"));
        assert_eq!(record.allelic_requirements, Some(vec!["X-LINKED".to_string()]));
        assert_eq!(record.study_overview.as_deref(), Some("Intellectual disability"));
        assert!(record.literature.is_empty());
    }

    #[test]
    fn clingen_record_carries_report_url() {
        let row = ClinGenRow {
            gene_symbol: "HTT ".to_string(),
            disease_label: "Huntington disease".to_string(),
            disease_id: "MONDO:0007739".to_string(),
            mode_of_inheritance: Some("AD".to_string()),
            classification: "Definitive".to_string(),
            expert_panel: "Huntington Disease GCEP".to_string(),
            online_report: Some("https://search.clinicalgenome.org/kb/gene-validity/CGGV:2".to_string()),
        };
        let record = build_clingen_evidence(&row, Some("MONDO_0007739".to_string()));
        assert_eq!(record.datasource_id, "clingen");
        assert_eq!(record.target_from_source_id, "HTT");
        assert_eq!(record.confidence.as_deref(), Some("Definitive"));
        assert_eq!(record.allelic_requirements, Some(vec!["AD".to_string()]));
        assert_eq!(record.study_id, "Huntington Disease GCEP");
        assert_eq!(record.urls.len(), 1);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json["urls"][0]["url"],
            "https://search.clinicalgenome.org/kb/gene-validity/CGGV:2"
        );
        assert!(json.get("cohortPhenotypes").is_none());
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let first = build_evidence(&row(), &phenotype(), &["a".to_string()], None, None);
        let duplicate = build_evidence(&row(), &phenotype(), &["b".to_string()], None, None);
        let mapped = build_evidence(
            &row(),
            &phenotype(),
            &[],
            Some("Orphanet_915".to_string()),
            None,
        );
        let kept = dedupe_evidence(vec![first.clone(), duplicate, mapped.clone()]);
        assert_eq!(kept, vec![first, mapped]);
    }
}
