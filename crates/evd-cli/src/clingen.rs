//! ClinGen gene validity pipeline.
//!
//! Stages:
//! 1. **Ingest**: Read the curation download
//! 2. **Map**: MONDO id first, then the curated label; exact matches only
//! 3. **Output**: One record per curation, unmapped diseases reported
//!
//! Mapping reuses the PanelApp lookup backends, cache and dictionary, but the
//! policy is always [`MappingPolicy::MatchOnly`]: a fuzzy label answer is
//! never trusted for curated data.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use evd_ingest::{ClinGenRow, read_clingen};
use evd_map::{ReconcileStats, Reconciler};
use evd_model::{MappingPolicy, Phenotype, ReconciledMapping};
use evd_output::{accepted_mapped_id, build_clingen_evidence, dedupe_evidence, write_evidence};

use crate::config::RunConfig;
use crate::pipeline::{build_lookup, save_cache, seeded_cache};
use crate::types::{ClinGenRunResult, UnmappedDisease};

/// Result of the mapping stage.
#[derive(Debug)]
pub struct CuratedMapping {
    pub mappings: HashMap<Phenotype, ReconciledMapping>,
    pub stats: ReconcileStats,
    pub saved_mappings: Option<PathBuf>,
}

pub fn ingest(path: &Path) -> Result<Vec<ClinGenRow>> {
    read_clingen(path).with_context(|| format!("read ClinGen curations {}", path.display()))
}

/// Distinct curated diseases in first-seen order.
pub fn diseases(rows: &[ClinGenRow]) -> Vec<Phenotype> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(ClinGenRow::to_phenotype)
        .filter(|phenotype| seen.insert(phenotype.clone()))
        .collect()
}

/// Maps every disease by identifier, then label. `None` when mapping is skipped.
pub fn map(diseases: &[Phenotype], config: &RunConfig) -> Result<Option<CuratedMapping>> {
    let Some(lookup) = build_lookup(&config.lookup)? else {
        info!("ontology mapping skipped");
        return Ok(None);
    };
    let cache = seeded_cache(config)?;
    let mut reconciler = Reconciler::new(lookup.as_ref(), &cache).with_retry(config.retry);
    let reconciled = reconciler.reconcile_by_identifier(diseases);
    let stats = reconciler.into_stats();
    let saved_mappings = save_cache(&cache, &stats, config)?;

    let mappings = reconciled
        .into_iter()
        .map(|mapping| (mapping.phenotype.clone(), mapping))
        .collect();
    Ok(Some(CuratedMapping {
        mappings,
        stats,
        saved_mappings,
    }))
}

#[derive(Debug)]
pub struct CuratedOutput {
    pub records_written: usize,
    pub duplicates_dropped: usize,
    pub mapped_records: usize,
    pub unmapped: BTreeSet<UnmappedDisease>,
}

pub fn output(
    rows: &[ClinGenRow],
    mapping: Option<&CuratedMapping>,
    config: &RunConfig,
) -> Result<CuratedOutput> {
    let mut unmapped = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mapped_id = row.to_phenotype().and_then(|phenotype| {
            mapping
                .and_then(|result| result.mappings.get(&phenotype))
                .and_then(|reconciled| accepted_mapped_id(reconciled, MappingPolicy::MatchOnly))
        });
        if mapping.is_some() && mapped_id.is_none() {
            unmapped.insert(UnmappedDisease {
                disease_id: row.disease_id.clone(),
                label: row.disease_label.clone(),
            });
        }
        records.push(build_clingen_evidence(row, mapped_id));
    }

    let total = records.len();
    let records = dedupe_evidence(records);
    let mapped_records = records
        .iter()
        .filter(|record| record.disease_from_source_mapped_id.is_some())
        .count();
    let records_written = write_evidence(&config.output_file, &records)
        .with_context(|| format!("write evidence to {}", config.output_file.display()))?;

    Ok(CuratedOutput {
        records_written,
        duplicates_dropped: total - records.len(),
        mapped_records,
        unmapped,
    })
}

/// Runs all stages for one ClinGen download.
pub fn run(config: &RunConfig) -> Result<ClinGenRunResult> {
    let run_span = info_span!("clingen", input = %config.input_file.display());
    let _run_guard = run_span.enter();

    let ingest_start = Instant::now();
    let rows = info_span!("ingest").in_scope(|| ingest(&config.input_file))?;
    info!(
        rows = rows.len(),
        duration_ms = ingest_start.elapsed().as_millis() as u64,
        "ingest complete"
    );

    let diseases = diseases(&rows);
    let map_start = Instant::now();
    let mapping = info_span!("map", diseases = diseases.len()).in_scope(|| map(&diseases, config))?;
    if let Some(result) = &mapping {
        info!(
            lookups = result.stats.lookups,
            cache_hits = result.stats.cache_hits,
            matched = result.stats.matched,
            failures = result.stats.failures(),
            duration_ms = map_start.elapsed().as_millis() as u64,
            "map complete"
        );
    }

    let output_start = Instant::now();
    let written = info_span!("output", path = %config.output_file.display())
        .in_scope(|| output(&rows, mapping.as_ref(), config))?;
    info!(
        records = written.records_written,
        duplicates = written.duplicates_dropped,
        duration_ms = output_start.elapsed().as_millis() as u64,
        "output complete"
    );
    if !written.unmapped.is_empty() {
        info!(count = written.unmapped.len(), "unmapped diseases");
        for disease in &written.unmapped {
            info!(id = %disease.disease_id, label = %disease.label, "unmapped disease");
        }
    }

    let saved_mappings = mapping
        .as_ref()
        .and_then(|result| result.saved_mappings.clone());
    Ok(ClinGenRunResult {
        output_file: config.output_file.clone(),
        rows_read: rows.len(),
        diseases: diseases.len(),
        mapping: mapping.map(|result| result.stats),
        mapped_records: written.mapped_records,
        unmapped: written.unmapped,
        duplicates_dropped: written.duplicates_dropped,
        records_written: written.records_written,
        saved_mappings,
    })
}
