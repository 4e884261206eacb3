//! Source layout and output options.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The four source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Handpieces,
    CutoffHints,
    Treatments,
    TreatmentTypes,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Handpieces,
        SourceKind::CutoffHints,
        SourceKind::Treatments,
        SourceKind::TreatmentTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Handpieces => "handpieces",
            SourceKind::CutoffHints => "cutoff hints",
            SourceKind::Treatments => "treatments",
            SourceKind::TreatmentTypes => "treatment types",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File names of the source datasets inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    pub handpieces: String,
    pub cutoff_hints: String,
    pub treatments: String,
    pub treatment_types: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            handpieces: "handpieces.csv".to_string(),
            cutoff_hints: "datos_drv_it.csv".to_string(),
            treatments: "treatments.csv".to_string(),
            treatment_types: "treatments_id.csv".to_string(),
        }
    }
}

impl SourceLayout {
    pub fn file_name(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Handpieces => &self.handpieces,
            SourceKind::CutoffHints => &self.cutoff_hints,
            SourceKind::Treatments => &self.treatments,
            SourceKind::TreatmentTypes => &self.treatment_types,
        }
    }

    /// Full path of a dataset inside `data_dir`.
    pub fn path(&self, data_dir: &Path, kind: SourceKind) -> PathBuf {
        data_dir.join(self.file_name(kind))
    }
}

/// Export format for report bundles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Tables only, as CSV.
    Csv,
    /// Report documents only, as JSON.
    Json,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}
