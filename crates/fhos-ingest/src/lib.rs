//! Source loading for FHOS equipment analysis.
//!
//! Reads the handpiece, cutoff-hint, treatment and treatment-type CSV
//! exports into Polars frames, extracts typed records, and fingerprints the
//! snapshot so downstream caches can key on it.

pub mod cells;
pub mod error;
pub mod reader;
pub mod sources;

pub use cells::{NotNumeric, cell_code, cell_integer, cell_number, cell_text, cell_timestamp};
pub use error::{IngestError, Result};
pub use reader::{SnapshotHasher, read_frame};
pub use sources::{
    CUTOFF_HINT_COLUMNS, HANDPIECE_COLUMNS, TREATMENT_COLUMNS, TREATMENT_TYPE_COLUMNS,
    build_lookup, cutoff_hints_from_frame, handpieces_from_frame, load_sources,
    treatment_types_from_frame, treatments_from_frame,
};
