//! Ontology mapping for normalized phenotypes.
//!
//! - [`Reconciler`] / [`reconcile`]: label and identifier lookups combined
//!   into one [`evd_model::ReconciledMapping`] per phenotype
//! - [`OntologyLookup`]: the lookup capability, with [`TableLookup`] and
//!   [`OlsLookup`] backends
//! - [`MappingCache`]: single-flight result cache
//! - [`MappingDictionary`]: cache contents persisted between runs

pub mod cache;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod repository;
pub mod retry;

pub use cache::{CacheOutcome, MappingCache};
pub use engine::{ReconcileStats, Reconciler, reconcile};
pub use error::{LookupError, Result};
pub use lookup::{DEFAULT_OLS_URL, LookupHit, OlsLookup, OntologyLookup, TableLookup};
pub use repository::MappingDictionary;
pub use retry::RetryPolicy;
