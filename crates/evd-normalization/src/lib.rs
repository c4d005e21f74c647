//! Phenotype normalization for curated gene–disease tables.
//!
//! Turns noisy, semicolon-joined phenotype fields into [`evd_model::Phenotype`]
//! values and pulls PubMed identifiers out of publication strings.

pub mod literature;
pub mod phenotype;
pub mod rules;

pub use literature::extract_pubmed_ids;
pub use phenotype::{PhenotypeNormalizer, normalize, normalize_label, split_fragments};
