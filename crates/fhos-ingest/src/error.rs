//! Error types for source loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading of the source snapshot.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Data directory not found.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Source CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === Content Errors ===
    /// Required column not found in a source table.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Cell that should hold a number holds something else.
    #[error("invalid {column} value '{value}' in row {row} of {path}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        path: PathBuf,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
