//! Evidence output: records built from normalized rows, written as
//! gzip-compressed JSON lines.

pub mod error;
pub mod evidence;
pub mod writer;

pub use error::{OutputError, Result};
pub use evidence::{
    accepted_mapped_id, build_clingen_evidence, build_evidence, dedupe_evidence,
};
pub use writer::{EvidenceWriter, write_evidence};
