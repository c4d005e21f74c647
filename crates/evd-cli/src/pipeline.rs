//! PanelApp evidence pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read the PanelApp export and filter rows
//! 2. **Normalize**: Split and clean the phenotype field of every row
//! 3. **Map**: Reconcile phenotypes with the ontology lookup (optional)
//! 4. **Literature**: Fetch PubMed references per panel (optional)
//! 5. **Output**: Build, de-duplicate and write evidence records
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! The [`RunConfig`] is the only run state and is passed in explicitly.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use evd_ingest::{LiteratureIndex, PanelAppClient, PanelAppRow, read_panelapp};
use evd_map::{
    MappingCache, MappingDictionary, OlsLookup, OntologyLookup, ReconcileStats, Reconciler,
    TableLookup,
};
use evd_model::{NormalizerOptions, Phenotype, ReconciledMapping};
use evd_normalization::{PhenotypeNormalizer, split_fragments};
use evd_output::{accepted_mapped_id, build_evidence, dedupe_evidence, write_evidence};

use crate::config::{LookupBackend, RunConfig};
use crate::types::RunResult;

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// Rows passing the filter, in file order.
    pub rows: Vec<PanelAppRow>,
    /// Rows in the export before filtering.
    pub rows_read: usize,
}

pub fn ingest(path: &Path) -> Result<IngestResult> {
    let all_rows = read_panelapp(path)
        .with_context(|| format!("read PanelApp export {}", path.display()))?;
    let rows_read = all_rows.len();
    let rows: Vec<PanelAppRow> = all_rows
        .into_iter()
        .filter(PanelAppRow::passes_filter)
        .collect();
    Ok(IngestResult { rows, rows_read })
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

/// A kept row with its normalized phenotypes.
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub row: PanelAppRow,
    pub phenotypes: Vec<Phenotype>,
    /// Original phenotype fragments, reported as `cohortPhenotypes`. The
    /// panel name when the phenotype field is missing or a placeholder.
    pub cohort_phenotypes: Vec<String>,
}

#[derive(Debug)]
pub struct NormalizeResult {
    pub rows: Vec<NormalizedRow>,
    /// Rows dropped because nothing usable was left.
    pub rows_without_phenotype: usize,
}

impl NormalizeResult {
    /// Distinct phenotypes in first-seen order.
    pub fn distinct_phenotypes(&self) -> Vec<Phenotype> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .flat_map(|row| row.phenotypes.iter())
            .filter(|phenotype| seen.insert(*phenotype))
            .cloned()
            .collect()
    }
}

pub fn normalize(rows: Vec<PanelAppRow>, options: &NormalizerOptions) -> NormalizeResult {
    let normalizer = PhenotypeNormalizer::new(options.clone());
    let mut rows_without_phenotype = 0usize;
    let mut normalized = Vec::with_capacity(rows.len());

    for row in rows {
        let entry = row.to_entry();
        let phenotypes = normalizer.normalize_entry(&entry);
        if phenotypes.is_empty() {
            debug!(
                symbol = %row.symbol,
                panel_id = %row.panel_id,
                "row has no usable phenotype"
            );
            rows_without_phenotype += 1;
            continue;
        }
        let cohort_phenotypes = match entry
            .source_string
            .as_deref()
            .filter(|value| !options.is_placeholder(value))
        {
            Some(raw) => split_fragments(raw),
            None => vec![entry.cohort_context.clone()],
        };
        normalized.push(NormalizedRow {
            row,
            phenotypes,
            cohort_phenotypes,
        });
    }

    NormalizeResult {
        rows: normalized,
        rows_without_phenotype,
    }
}

// ============================================================================
// Stage 3: Map
// ============================================================================

/// Result of the mapping stage.
#[derive(Debug)]
pub struct MapResult {
    pub mappings: HashMap<Phenotype, ReconciledMapping>,
    pub stats: ReconcileStats,
    pub saved_mappings: Option<PathBuf>,
}

pub(crate) fn build_lookup(backend: &LookupBackend) -> Result<Option<Box<dyn OntologyLookup>>> {
    let lookup: Box<dyn OntologyLookup> = match backend {
        LookupBackend::Skip => return Ok(None),
        LookupBackend::Table(path) => Box::new(
            TableLookup::from_path(path)
                .with_context(|| format!("load lookup table {}", path.display()))?,
        ),
        LookupBackend::Ols(url) => {
            Box::new(OlsLookup::new(url.as_str()).context("create ontology lookup client")?)
        }
    };
    Ok(Some(lookup))
}

/// Reconciles every distinct phenotype. Returns `None` when mapping is skipped.
pub fn map(phenotypes: &[Phenotype], config: &RunConfig) -> Result<Option<MapResult>> {
    let Some(lookup) = build_lookup(&config.lookup)? else {
        info!("ontology mapping skipped");
        return Ok(None);
    };

    let cache = seeded_cache(config)?;
    let mut reconciler = Reconciler::new(lookup.as_ref(), &cache).with_retry(config.retry);
    let reconciled = reconciler.reconcile(phenotypes);
    let stats = reconciler.into_stats();
    let saved_mappings = save_cache(&cache, &stats, config)?;

    let mappings = reconciled
        .into_iter()
        .map(|mapping| (mapping.phenotype.clone(), mapping))
        .collect();
    Ok(Some(MapResult {
        mappings,
        stats,
        saved_mappings,
    }))
}

/// A mapping cache seeded from the configured dictionary, if any.
pub(crate) fn seeded_cache(config: &RunConfig) -> Result<MappingCache> {
    let cache = MappingCache::new();
    if let Some(path) = &config.mappings_dict {
        let dictionary = MappingDictionary::load(path)?;
        let seeded = dictionary.seed(&cache);
        info!(seeded, path = %path.display(), "seeded mapping cache");
    }
    Ok(cache)
}

/// Saves the cache when a dictionary path is configured.
pub(crate) fn save_cache(
    cache: &MappingCache,
    stats: &ReconcileStats,
    config: &RunConfig,
) -> Result<Option<PathBuf>> {
    let Some(path) = &config.save_mappings else {
        return Ok(None);
    };
    MappingDictionary::from_cache(cache, &stats.failed_terms).save(path)?;
    Ok(Some(path.clone()))
}

// ============================================================================
// Stage 4: Literature
// ============================================================================

/// Fetches PubMed references for every panel. Empty when disabled.
pub fn literature(rows: &[NormalizedRow], config: &RunConfig) -> Result<LiteratureIndex> {
    if !config.fetch_literature {
        info!("literature fetch skipped");
        return Ok(LiteratureIndex::new());
    }
    let mut seen = HashSet::new();
    let panel_ids: Vec<&str> = rows
        .iter()
        .map(|normalized| normalized.row.panel_id.as_str())
        .filter(|panel_id| seen.insert(*panel_id))
        .collect();

    let client = PanelAppClient::new(config.panelapp_url.as_str())
        .context("create PanelApp client")?;
    Ok(client.fetch_literature(panel_ids))
}

// ============================================================================
// Stage 5: Output
// ============================================================================

#[derive(Debug)]
pub struct OutputResult {
    pub records_written: usize,
    pub duplicates_dropped: usize,
    pub mapped_records: usize,
}

pub fn output(
    rows: &[NormalizedRow],
    mapping: Option<&MapResult>,
    literature: &LiteratureIndex,
    config: &RunConfig,
) -> Result<OutputResult> {
    let mut records = Vec::new();
    for normalized in rows {
        let row = &normalized.row;
        let references = literature.get(&row.panel_id, &row.symbol);
        for phenotype in &normalized.phenotypes {
            let mapped_id = mapping
                .and_then(|result| result.mappings.get(phenotype))
                .and_then(|reconciled| accepted_mapped_id(reconciled, config.policy));
            records.push(build_evidence(
                row,
                phenotype,
                &normalized.cohort_phenotypes,
                mapped_id,
                references,
            ));
        }
    }

    let total = records.len();
    let records = dedupe_evidence(records);
    let mapped_records = records
        .iter()
        .filter(|record| record.disease_from_source_mapped_id.is_some())
        .count();
    let records_written = write_evidence(&config.output_file, &records)
        .with_context(|| format!("write evidence to {}", config.output_file.display()))?;

    Ok(OutputResult {
        records_written,
        duplicates_dropped: total - records.len(),
        mapped_records,
    })
}

// ============================================================================
// Full run
// ============================================================================

/// Runs all stages for one PanelApp export.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    let run_span = info_span!("panelapp", input = %config.input_file.display());
    let _run_guard = run_span.enter();

    let ingest_span = info_span!("ingest");
    let ingest_start = Instant::now();
    let IngestResult { rows, rows_read } = ingest_span.in_scope(|| ingest(&config.input_file))?;
    let rows_kept = rows.len();
    info!(
        rows_read,
        rows_kept,
        duration_ms = ingest_start.elapsed().as_millis() as u64,
        "ingest complete"
    );

    let normalize_span = info_span!("normalize", rows = rows_kept);
    let normalize_start = Instant::now();
    let normalized = normalize_span.in_scope(|| normalize(rows, &config.normalizer));
    let phenotypes = normalized.distinct_phenotypes();
    info!(
        rows = normalized.rows.len(),
        rows_without_phenotype = normalized.rows_without_phenotype,
        phenotypes = phenotypes.len(),
        duration_ms = normalize_start.elapsed().as_millis() as u64,
        "normalize complete"
    );

    let map_span = info_span!("map", phenotypes = phenotypes.len());
    let map_start = Instant::now();
    let mapping = map_span.in_scope(|| map(&phenotypes, config))?;
    if let Some(result) = &mapping {
        info!(
            lookups = result.stats.lookups,
            cache_hits = result.stats.cache_hits,
            matched = result.stats.matched,
            fuzzy = result.stats.fuzzy,
            failures = result.stats.failures(),
            duration_ms = map_start.elapsed().as_millis() as u64,
            "map complete"
        );
    }

    let literature_span = info_span!("literature");
    let literature_start = Instant::now();
    let references = literature_span.in_scope(|| literature(&normalized.rows, config))?;
    info!(
        pairs = references.len(),
        duration_ms = literature_start.elapsed().as_millis() as u64,
        "literature complete"
    );

    let output_span = info_span!("output", path = %config.output_file.display());
    let output_start = Instant::now();
    let written = output_span.in_scope(|| {
        output(&normalized.rows, mapping.as_ref(), &references, config)
    })?;
    info!(
        records = written.records_written,
        duplicates = written.duplicates_dropped,
        duration_ms = output_start.elapsed().as_millis() as u64,
        "output complete"
    );

    let saved_mappings = mapping
        .as_ref()
        .and_then(|result| result.saved_mappings.clone());
    Ok(RunResult {
        output_file: config.output_file.clone(),
        rows_read,
        rows_kept,
        rows_without_phenotype: normalized.rows_without_phenotype,
        phenotypes: phenotypes.len(),
        mapping: mapping.map(|result| result.stats),
        mapped_records: written.mapped_records,
        literature_pairs: references.len(),
        duplicates_dropped: written.duplicates_dropped,
        records_written: written.records_written,
        saved_mappings,
    })
}
