//! Run configuration passed explicitly to every pipeline stage.

use std::path::PathBuf;

use evd_ingest::DEFAULT_PANELAPP_URL;
use evd_map::{DEFAULT_OLS_URL, RetryPolicy};
use evd_model::{MappingPolicy, NormalizerOptions};

/// Where ontology mappings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupBackend {
    /// No mapping; `diseaseFromSourceMappedId` is omitted.
    Skip,
    /// Local tab-separated lookup table.
    Table(PathBuf),
    /// Ontology Lookup Service at the given base URL.
    Ols(String),
}

impl Default for LookupBackend {
    fn default() -> Self {
        Self::Ols(DEFAULT_OLS_URL.to_string())
    }
}

/// Everything one `panelapp` run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub lookup: LookupBackend,
    pub policy: MappingPolicy,
    pub retry: RetryPolicy,
    pub normalizer: NormalizerOptions,
    /// Dictionary used to seed the mapping cache.
    pub mappings_dict: Option<PathBuf>,
    /// Where to save the mapping cache after the run.
    pub save_mappings: Option<PathBuf>,
    pub fetch_literature: bool,
    pub panelapp_url: String,
}

impl RunConfig {
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            lookup: LookupBackend::default(),
            policy: MappingPolicy::default(),
            retry: RetryPolicy::default(),
            normalizer: NormalizerOptions::default(),
            mappings_dict: None,
            save_mappings: None,
            fetch_literature: true,
            panelapp_url: DEFAULT_PANELAPP_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: LookupBackend) -> Self {
        self.lookup = lookup;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MappingPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: NormalizerOptions) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_mappings_dict(mut self, path: Option<PathBuf>) -> Self {
        self.mappings_dict = path;
        self
    }

    #[must_use]
    pub fn with_save_mappings(mut self, path: Option<PathBuf>) -> Self {
        self.save_mappings = path;
        self
    }

    #[must_use]
    pub fn with_literature(mut self, enable: bool) -> Self {
        self.fetch_literature = enable;
        self
    }

    #[must_use]
    pub fn with_panelapp_url(mut self, url: impl Into<String>) -> Self {
        self.panelapp_url = url.into();
        self
    }

    pub fn mapping_enabled(&self) -> bool {
        self.lookup != LookupBackend::Skip
    }
}
