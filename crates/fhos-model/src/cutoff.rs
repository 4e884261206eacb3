use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suggested cutoff for one unit, as exported by the service spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffHint {
    pub din: String,
    /// Spreadsheet day count since 1899-12-30; `None` when the cell was empty
    /// or not numeric.
    pub serial: Option<f64>,
}

/// The unit under analysis and the earliest instant included in its views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CutoffContext {
    pub din: String,
    pub cutoff: DateTime<Utc>,
}

impl CutoffContext {
    pub fn new(din: impl Into<String>, cutoff: DateTime<Utc>) -> Self {
        Self {
            din: din.into(),
            cutoff,
        }
    }
}
