//! CSV reading and snapshot fingerprinting.

use std::path::Path;

use polars::prelude::*;
use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Reads a CSV file into a Polars DataFrame.
///
/// Every column is read as text: identifiers keep their leading zeros and
/// numeric columns are converted cell by cell during record extraction, where
/// a bad literal can be reported with its row.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Accumulates a SHA-256 digest over a set of source files.
///
/// Two loads of byte-identical files produce the same fingerprint, which is
/// what the analysis cache keys on.
pub struct SnapshotHasher {
    hasher: Sha256,
}

impl SnapshotHasher {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Adds one file, labelled so swapping two files changes the digest.
    pub fn add_file(&mut self, label: &str, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.hasher.update(label.as_bytes());
        self.hasher.update([0u8]);
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(&bytes);
        Ok(())
    }

    /// Hex-encoded digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Default for SnapshotHasher {
    fn default() -> Self {
        Self::new()
    }
}
