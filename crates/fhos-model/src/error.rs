use chrono::NaiveDate;
use thiserror::Error;

/// Faults that stop one analysis invocation.
///
/// Row-level problems never surface here; they are collected as
/// [`RowIssue`](crate::RowIssue)s on the analysis instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    // === Cutoff ===
    #[error("cutoff date {date} is outside the allowed range {min} to {max}")]
    CutoffOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("invalid cutoff date '{value}': expected YYYY-MM-DD")]
    InvalidCutoff { value: String },

    // === Device ===
    #[error("device identifier must not be empty")]
    EmptyDin,

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
