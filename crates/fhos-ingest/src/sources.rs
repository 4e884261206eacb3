//! Extraction of typed records from the four source tables.
//!
//! Loading is all-or-nothing: any missing file, missing column or bad
//! numeric literal fails the whole snapshot so no analysis runs on partial
//! data.

use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::{debug, info, warn};

use fhos_model::{
    CutoffHint, HandpieceRecord, SourceKind, SourceLayout, SourceTables, TreatmentLookup,
    TreatmentRecord, TreatmentType, UsageCounters,
};

use crate::cells::{
    NotNumeric, cell_code, cell_integer, cell_number, cell_text, cell_timestamp,
};
use crate::error::{IngestError, Result};
use crate::reader::{SnapshotHasher, read_frame};

/// Required columns of the handpiece table.
pub const HANDPIECE_COLUMNS: &[&str] = &[
    "din",
    "handpiece_id",
    "serial_number",
    "created_at",
    "pulse_count",
    "burst_count",
    "activation_count",
    "modulation_count",
];

/// Required columns of the cutoff-hint table.
pub const CUTOFF_HINT_COLUMNS: &[&str] = &["din", "fecha_corte"];

/// Required columns of the treatment table.
pub const TREATMENT_COLUMNS: &[&str] = &["din", "code", "reported_at", "duration"];

/// Required columns of the treatment-type table.
pub const TREATMENT_TYPE_COLUMNS: &[&str] = &[
    "Treatment_ID",
    "Tipo",
    "Subtipo",
    "Subprograma",
    "PVP",
    "Secuencia",
];

/// Loads all four source tables from `data_dir`.
pub fn load_sources(data_dir: &Path, layout: &SourceLayout) -> Result<SourceTables> {
    if !data_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: data_dir.to_path_buf(),
        });
    }
    let start = Instant::now();
    let mut hasher = SnapshotHasher::new();
    for kind in SourceKind::ALL {
        let path = layout.path(data_dir, kind);
        if !path.is_file() {
            return Err(IngestError::FileNotFound { path });
        }
        hasher.add_file(kind.as_str(), &path)?;
    }

    let path = layout.path(data_dir, SourceKind::Handpieces);
    let handpieces = handpieces_from_frame(&read_frame(&path)?, &path)?;

    let path = layout.path(data_dir, SourceKind::CutoffHints);
    let cutoff_hints = cutoff_hints_from_frame(&read_frame(&path)?, &path)?;

    let path = layout.path(data_dir, SourceKind::Treatments);
    let treatments = treatments_from_frame(&read_frame(&path)?, &path)?;

    let path = layout.path(data_dir, SourceKind::TreatmentTypes);
    let lookup = build_lookup(treatment_types_from_frame(&read_frame(&path)?, &path)?);

    let fingerprint = hasher.finish();
    info!(
        data_dir = %data_dir.display(),
        handpieces = handpieces.len(),
        cutoff_hints = cutoff_hints.len(),
        treatments = treatments.len(),
        treatment_types = lookup.len(),
        fingerprint = %fingerprint,
        duration_ms = start.elapsed().as_millis(),
        "sources loaded"
    );
    Ok(SourceTables {
        handpieces,
        cutoff_hints,
        treatments,
        lookup,
        fingerprint,
    })
}

/// Extracts handpiece records. Counter cells may be blank, but not malformed.
pub fn handpieces_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<HandpieceRecord>> {
    let frame = SourceFrame::new(df, path, HANDPIECE_COLUMNS)?;
    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        records.push(HandpieceRecord {
            din: frame.text("din", row)?.unwrap_or_default(),
            handpiece_id: frame.text("handpiece_id", row)?.unwrap_or_default(),
            serial_number: frame.text("serial_number", row)?.unwrap_or_default(),
            created_at: cell_timestamp(&frame.cell("created_at", row)?),
            counters: UsageCounters {
                pulse: frame.integer("pulse_count", row)?,
                burst: frame.integer("burst_count", row)?,
                activation: frame.integer("activation_count", row)?,
                modulation: frame.integer("modulation_count", row)?,
            },
        });
    }
    debug!(path = %path.display(), rows = records.len(), "handpiece records extracted");
    Ok(records)
}

/// Extracts cutoff hints. A non-numeric `fecha_corte` is kept as a missing
/// serial rather than rejected; the suggested cutoff then falls back to the
/// floor date.
pub fn cutoff_hints_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<CutoffHint>> {
    let frame = SourceFrame::new(df, path, CUTOFF_HINT_COLUMNS)?;
    let mut hints = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let serial = cell_number(&frame.cell("fecha_corte", row)?).unwrap_or_else(|NotNumeric(value)| {
            debug!(row, value = %value, "non-numeric cutoff hint ignored");
            None
        });
        hints.push(CutoffHint {
            din: frame.text("din", row)?.unwrap_or_default(),
            serial,
        });
    }
    Ok(hints)
}

/// Extracts treatment events.
pub fn treatments_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<TreatmentRecord>> {
    let frame = SourceFrame::new(df, path, TREATMENT_COLUMNS)?;
    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        records.push(TreatmentRecord {
            din: frame.text("din", row)?.unwrap_or_default(),
            code: frame.code("code", row)?.unwrap_or_default(),
            reported_at: cell_timestamp(&frame.cell("reported_at", row)?),
            duration_ms: frame.integer("duration", row)?,
        });
    }
    debug!(path = %path.display(), rows = records.len(), "treatment records extracted");
    Ok(records)
}

/// Extracts treatment-type reference rows. Rows without a code are skipped.
pub fn treatment_types_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<TreatmentType>> {
    let frame = SourceFrame::new(df, path, TREATMENT_TYPE_COLUMNS)?;
    let mut types = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(code) = frame.code("Treatment_ID", row)? else {
            continue;
        };
        types.push(TreatmentType {
            code,
            category: frame.text("Tipo", row)?,
            program: frame.text("Subtipo", row)?,
            subprogram: frame.text("Subprograma", row)?,
            price: frame.number("PVP", row)?,
            sequence: frame.number("Secuencia", row)?,
        });
    }
    Ok(types)
}

/// Builds the lookup table; later duplicates of a code are dropped.
pub fn build_lookup(types: Vec<TreatmentType>) -> TreatmentLookup {
    let mut lookup = TreatmentLookup::new();
    for entry in types {
        let code = entry.code.clone();
        if !lookup.insert(entry) {
            warn!(code = %code, "duplicate treatment code ignored");
        }
    }
    lookup
}

/// A source frame whose required columns have been checked.
struct SourceFrame<'a> {
    df: &'a DataFrame,
    path: PathBuf,
}

impl<'a> SourceFrame<'a> {
    fn new(df: &'a DataFrame, path: &Path, required: &[&str]) -> Result<Self> {
        if let Some(missing) = required.iter().find(|column| df.column(column).is_err()) {
            return Err(IngestError::MissingColumn {
                column: (*missing).to_string(),
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            df,
            path: path.to_path_buf(),
        })
    }

    fn column(&self, name: &str) -> Result<&'a Column> {
        self.df.column(name).map_err(|_| IngestError::MissingColumn {
            column: name.to_string(),
            path: self.path.clone(),
        })
    }

    fn cell(&self, name: &str, row: usize) -> Result<AnyValue<'a>> {
        self.column(name)?
            .get(row)
            .map_err(|e| IngestError::DataFrame {
                message: e.to_string(),
            })
    }

    fn text(&self, name: &str, row: usize) -> Result<Option<String>> {
        Ok(cell_text(&self.cell(name, row)?))
    }

    fn code(&self, name: &str, row: usize) -> Result<Option<String>> {
        Ok(cell_code(&self.cell(name, row)?))
    }

    fn integer(&self, name: &str, row: usize) -> Result<Option<i64>> {
        cell_integer(&self.cell(name, row)?).map_err(|NotNumeric(value)| self.invalid(name, row, value))
    }

    fn number(&self, name: &str, row: usize) -> Result<Option<f64>> {
        cell_number(&self.cell(name, row)?).map_err(|NotNumeric(value)| self.invalid(name, row, value))
    }

    fn invalid(&self, column: &str, row: usize, value: String) -> IngestError {
        IngestError::InvalidValue {
            column: column.to_string(),
            row,
            value,
            path: self.path.clone(),
        }
    }
}
