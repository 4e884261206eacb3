//! CLI library components for FHOS equipment analysis.

pub mod analysis;
pub mod logging;
