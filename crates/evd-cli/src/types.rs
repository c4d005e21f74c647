use std::collections::BTreeSet;
use std::path::PathBuf;

use evd_map::ReconcileStats;

#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub output_file: PathBuf,
    /// Rows in the export.
    pub rows_read: usize,
    /// Rows passing the list/version/status filter.
    pub rows_kept: usize,
    /// Kept rows that yielded no usable phenotype.
    pub rows_without_phenotype: usize,
    /// Distinct phenotypes across all kept rows.
    pub phenotypes: usize,
    /// `None` when mapping was skipped.
    pub mapping: Option<ReconcileStats>,
    /// Records carrying a mapped ontology id.
    pub mapped_records: usize,
    /// (panel, gene) pairs with literature references.
    pub literature_pairs: usize,
    pub duplicates_dropped: usize,
    pub records_written: usize,
    pub saved_mappings: Option<PathBuf>,
}

/// A curated disease that no ontology term was accepted for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnmappedDisease {
    pub disease_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClinGenRunResult {
    pub output_file: PathBuf,
    /// Curations in the download.
    pub rows_read: usize,
    /// Distinct (label, MONDO id) diseases sent to mapping.
    pub diseases: usize,
    /// `None` when mapping was skipped.
    pub mapping: Option<ReconcileStats>,
    pub mapped_records: usize,
    /// Diseases without an exact mapping, sorted. Empty when mapping was skipped.
    pub unmapped: BTreeSet<UnmappedDisease>,
    pub duplicates_dropped: usize,
    pub records_written: usize,
    pub saved_mappings: Option<PathBuf>,
}
