//! FHOS report assembly.
//!
//! Turns a [`DeviceAnalysis`](fhos_core::DeviceAnalysis) into presentation
//! tables, the summary and detail report documents, and the files of a
//! report bundle.

pub mod documents;
pub mod export;
pub mod tables;

pub use documents::{
    DETAIL_TITLE, ReportDocument, ReportSection, ReportTable, SUMMARY_TITLE, detail_report,
    summary_report,
};
pub use export::{ReportPaths, file_stem, write_csv, write_json, write_report_bundle};
pub use tables::{detail_frame, duration_minutes, summary_frame, usage_frame};
