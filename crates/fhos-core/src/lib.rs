//! FHOS usage pipeline.
//!
//! Leaf first: [`identity`] classifies handpieces, [`usage`] rescales their
//! counters, [`service_life`] estimates remaining life, [`temporal`] filters
//! by cutoff and derives activity, [`treatments`] joins treatment events to
//! their types, and [`summary`] aggregates them. [`pipeline`] runs all of it
//! for one device; [`cache`] memoizes those runs.

pub mod cache;
pub mod cutoff;
pub mod datetime;
pub mod identity;
pub mod pipeline;
pub mod service_life;
pub mod summary;
pub mod temporal;
pub mod treatments;
pub mod usage;

pub use cache::{AnalysisCache, AnalysisKey};
pub use cutoff::{CUTOFF_FLOOR, parse_cutoff_date, resolve_cutoff, suggested_cutoff};
pub use datetime::{
    TimestampError, format_for_display, parse_timestamp, spreadsheet_serial_to_datetime,
    start_of_day,
};
pub use identity::{classify_handpiece, classify_value};
pub use pipeline::{DeviceAnalysis, analyze_device};
pub use service_life::estimate_service_life;
pub use summary::{summarize, summarize_all};
pub use temporal::{Filtered, filter_since, sort_newest_first, status_at};
pub use treatments::{join_treatment, join_treatments};
pub use usage::{normalize_usage, rescale_pulse};
