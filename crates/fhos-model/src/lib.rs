//! Data model for FHOS equipment usage analysis.
//!
//! Plain records flowing through the pipeline: raw source rows, the rows the
//! pipeline derives from them, and the summaries handed to presentation.

pub mod cutoff;
pub mod device;
pub mod error;
pub mod options;
pub mod records;
pub mod sources;
pub mod summary;
pub mod treatment;

pub use cutoff::{CutoffContext, CutoffHint};
pub use device::{DeviceClass, ServiceLife, UsageStatus};
pub use error::{PipelineError, Result};
pub use options::{OutputFormat, SourceKind, SourceLayout};
pub use records::{
    Dated, DeviceUsageRow, HandpieceRecord, HandpieceUsage, RawTimestamp, RowIssue, UsageCounters,
};
pub use sources::SourceTables;
pub use summary::{SummaryDimension, SummaryRow, TreatmentSummary};
pub use treatment::{JoinedTreatment, TreatmentLookup, TreatmentRecord, TreatmentType};
