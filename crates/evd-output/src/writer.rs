//! Gzip-compressed JSON-lines writer.
//!
//! Records go to a temporary file next to the destination, which is renamed
//! into place by [`EvidenceWriter::finish`]. A run that fails half-way never
//! leaves a truncated output file behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;
use tracing::info;

use evd_model::EvidenceRecord;

use crate::error::{OutputError, Result};

pub struct EvidenceWriter {
    encoder: GzEncoder<BufWriter<NamedTempFile>>,
    path: PathBuf,
    written: usize,
}

impl EvidenceWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| OutputError::Create {
            dir: dir.clone(),
            source,
        })?;
        let temp = NamedTempFile::new_in(&dir)
            .map_err(|source| OutputError::Create { dir, source })?;
        Ok(Self {
            encoder: GzEncoder::new(BufWriter::new(temp), Compression::default()),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    pub fn write(&mut self, record: &EvidenceRecord) -> Result<()> {
        serde_json::to_writer(&mut self.encoder, record)?;
        self.encoder.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Completes the gzip stream and moves the file to its destination.
    /// Returns the number of records written.
    pub fn finish(self) -> Result<usize> {
        let buffered = self.encoder.finish()?;
        let temp = buffered
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)?;
        temp.persist(&self.path)
            .map_err(|err| OutputError::Persist {
                path: self.path.clone(),
                source: err.error,
            })?;
        info!(path = %self.path.display(), records = self.written, "wrote evidence");
        Ok(self.written)
    }
}

/// Writes all records to `path`. Returns the number written.
pub fn write_evidence(path: &Path, records: &[EvidenceRecord]) -> Result<usize> {
    let mut writer = EvidenceWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}
