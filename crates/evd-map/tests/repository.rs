use std::collections::BTreeSet;

use evd_map::{LookupHit, MappingCache, MappingDictionary, Reconciler, Result};
use evd_model::{MatchQuality, Phenotype};

fn label(text: &str) -> Phenotype {
    Phenotype::new(Some(text.to_string()), None).unwrap()
}

#[test]
fn dictionary_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mappings.json");

    let cache = MappingCache::new();
    let lookup = |text: &str| -> Result<Option<LookupHit>> {
        Ok(Some(
            LookupHit::fuzzy(format!("http://www.ebi.ac.uk/efo/EFO_{}", text.len()))
                .with_label(text.to_lowercase()),
        ))
    };
    Reconciler::new(&lookup, &cache).reconcile(&[label("Rett syndrome"), label("Leigh syndrome")]);

    let mut dictionary = MappingDictionary::from_cache(&cache, &BTreeSet::new());
    dictionary.save(&path).unwrap();
    assert!(dictionary.saved_at.is_some());

    let loaded = MappingDictionary::load(&path).unwrap();
    assert_eq!(loaded, dictionary);
    assert_eq!(loaded.version, "1.0");
    assert_eq!(
        loaded.mappings["Rett syndrome"].match_quality,
        MatchQuality::Fuzzy
    );
}

#[test]
fn seeded_terms_skip_the_lookup() {
    let seeded = MappingCache::new();
    let lookup = |_: &str| -> Result<Option<LookupHit>> { Ok(Some(LookupHit::matched("EFO:1"))) };
    Reconciler::new(&lookup, &seeded).reconcile(&[label("Rett syndrome")]);
    let dictionary = MappingDictionary::from_cache(&seeded, &BTreeSet::new());

    let cache = MappingCache::new();
    assert_eq!(dictionary.seed(&cache), 1);

    let refuse = |text: &str| -> Result<Option<LookupHit>> {
        panic!("unexpected lookup for {text}")
    };
    let mut reconciler = Reconciler::new(&refuse, &cache);
    let mappings = reconciler.reconcile(&[label("Rett syndrome")]);
    assert_eq!(mappings[0].quality(), MatchQuality::Match);
    assert_eq!(reconciler.stats().cache_hits, 1);
    assert_eq!(reconciler.stats().lookups, 0);
}

#[test]
fn failed_terms_are_not_saved() {
    let cache = MappingCache::new();
    let lookup = |_: &str| -> Result<Option<LookupHit>> { Ok(None) };
    Reconciler::new(&lookup, &cache).reconcile(&[label("A"), label("B")]);

    let failed: BTreeSet<String> = ["B".to_string()].into();
    let dictionary = MappingDictionary::from_cache(&cache, &failed);
    assert_eq!(dictionary.mappings.keys().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn missing_metadata_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(&path, r#"{"mappings": {}}"#).unwrap();

    let loaded = MappingDictionary::load(&path).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.version, "1.0");
    assert_eq!(loaded.saved_at, None);
}

#[test]
fn unreadable_dictionary_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json").unwrap();

    let err = MappingDictionary::load(&path).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
