pub mod error;
pub mod evidence;
pub mod ids;
pub mod mapping;
pub mod options;
pub mod phenotype;

pub use error::{ModelError, Result};
pub use evidence::{
    CLINGEN_DATASOURCE, DedupeKey, EvidenceRecord, EvidenceUrl, GENETIC_LITERATURE_DATATYPE,
    GENOMICS_ENGLAND_DATASOURCE,
};
pub use ids::{Namespace, SourceId};
pub use mapping::{
    MappingPolicy, MappingResult, MappingRoute, MatchQuality, ReconciledMapping, strip_namespace,
};
pub use options::{DEFAULT_PLACEHOLDERS, NormalizerOptions};
pub use phenotype::{Phenotype, RawPhenotypeEntry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_detection() {
        let options = NormalizerOptions::default();
        assert!(options.is_placeholder("No OMIM phenotype"));
        assert!(options.is_placeholder("  no omim PHENOTYPE "));
        assert!(options.is_placeholder("   "));
        assert!(!options.is_placeholder("Intellectual disability"));

        let options = options.with_placeholder("N/A");
        assert!(options.is_placeholder("n/a"));
    }

    #[test]
    fn evidence_serializes_camel_case() {
        let record = EvidenceRecord {
            datasource_id: GENOMICS_ENGLAND_DATASOURCE.to_string(),
            datatype_id: GENETIC_LITERATURE_DATATYPE.to_string(),
            confidence: Some("green".to_string()),
            disease_from_source: "Bladder cancer, somatic".to_string(),
            disease_from_source_id: Some("OMIM:109800".to_string()),
            disease_from_source_mapped_id: None,
            cohort_phenotypes: vec![],
            target_from_source_id: "FGFR3".to_string(),
            allelic_requirements: None,
            study_id: "245".to_string(),
            study_overview: None,
            literature: Default::default(),
            urls: vec![],
        };
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["datasourceId"], "genomics_england");
        assert_eq!(json["diseaseFromSourceId"], "OMIM:109800");
        assert!(json.get("diseaseFromSourceMappedId").is_none());
        assert!(json.get("literature").is_none());
    }

    #[test]
    fn phenotype_requires_label_or_id() {
        assert!(Phenotype::new(Some("  ".to_string()), None).is_none());
        let by_id = Phenotype::new(None, Some(SourceId::omim("305400").unwrap())).unwrap();
        assert_eq!(by_id.display_name(), "OMIM:305400");
    }
}
