//! CSV and JSON export of report bundles.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::info;

use fhos_core::DeviceAnalysis;
use fhos_model::OutputFormat;

use crate::documents::{detail_report, summary_report};
use crate::tables::{detail_frame, summary_frame, usage_frame};

/// Writes a table as CSV with a header row. Missing values are empty cells.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(df.get_column_names().iter().map(|name| name.as_str()))
        .with_context(|| format!("write header to {}", path.display()))?;
    let mut record = Vec::with_capacity(df.width());
    for index in 0..df.height() {
        record.clear();
        for column in df.get_columns() {
            record.push(csv_cell(column.get(index)?));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("write row {index} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn csv_cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Float64(value) => format_float(value),
        AnyValue::Float32(value) => format_float(f64::from(value)),
        value => value.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Writes a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))
}

/// File-name form of a device identifier: anything other than ASCII
/// alphanumerics, `-` and `_` becomes `_`.
pub fn file_stem(din: &str) -> String {
    din.trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Files written for one device, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPaths {
    pub files: Vec<PathBuf>,
}

/// Writes every output of one analysis into `output_dir`.
///
/// CSV: `manipulos_{din}.csv`, `tratamientos_{din}.csv` and, when any
/// treatment was counted, `resumen_{tipo|programa|subprograma}_{din}.csv`.
/// JSON: `informe_resumen_{din}.json` and `informe_detallado_{din}.json`.
pub fn write_report_bundle(
    analysis: &DeviceAnalysis,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<ReportPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let stem = file_stem(&analysis.context.din);
    let mut paths = ReportPaths::default();

    if format.includes_csv() {
        let path = output_dir.join(format!("manipulos_{stem}.csv"));
        write_csv(&usage_frame(&analysis.usage)?, &path)?;
        paths.files.push(path);

        if analysis.has_treatment_summary() {
            for summary in &analysis.summaries {
                let key = summary.dimension.file_key();
                let path = output_dir.join(format!("resumen_{key}_{stem}.csv"));
                write_csv(&summary_frame(summary)?, &path)?;
                paths.files.push(path);
            }
        }

        let path = output_dir.join(format!("tratamientos_{stem}.csv"));
        write_csv(&detail_frame(&analysis.treatments)?, &path)?;
        paths.files.push(path);
    }

    if format.includes_json() {
        let path = output_dir.join(format!("informe_resumen_{stem}.json"));
        write_json(&summary_report(analysis)?, &path)?;
        paths.files.push(path);

        let path = output_dir.join(format!("informe_detallado_{stem}.json"));
        write_json(&detail_report(analysis)?, &path)?;
        paths.files.push(path);
    }

    info!(
        din = %analysis.context.din,
        output_dir = %output_dir.display(),
        files = paths.files.len(),
        "report bundle written"
    );
    Ok(paths)
}
