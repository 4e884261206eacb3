use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame, DataType};

use fhos_cli::analysis::{AnalyzeResult, DeviceOutcome};
use fhos_core::{DeviceAnalysis, format_for_display};
use fhos_model::{SummaryDimension, UsageStatus};
use fhos_report::tables::COL_STATUS;
use fhos_report::{summary_frame, usage_frame};

const NO_HANDPIECES: &str = "No hay manípulos registrados desde la fecha de corte.";
const NO_TREATMENTS: &str = "No hay tratamientos registrados desde la fecha de corte.";

pub fn print_analysis(result: &AnalyzeResult) {
    println!("Datos: {}", result.data_dir.display());
    match &result.output_dir {
        Some(dir) => println!("Salida: {}", dir.display()),
        None => println!("Salida: simulación, no se escriben ficheros"),
    }
    for outcome in &result.devices {
        println!();
        match &outcome.analysis {
            Some(analysis) => print_device(outcome, analysis),
            None => println!("DIN: {}", outcome.din),
        }
    }
    println!();
    print_overview(result);
    let failed: Vec<_> = result
        .devices
        .iter()
        .filter_map(|d| d.error.as_ref().map(|e| (&d.din, e)))
        .collect();
    if !failed.is_empty() {
        eprintln!("Errores:");
        for (din, error) in failed {
            eprintln!("- {din}: {error}");
        }
    }
}

fn print_device(outcome: &DeviceOutcome, analysis: &DeviceAnalysis) {
    println!("DIN: {}", outcome.din);
    println!(
        "Fecha de corte: {}",
        format_for_display(analysis.context.cutoff)
    );

    if analysis.usage.is_empty() {
        println!("{NO_HANDPIECES}");
    } else {
        match usage_frame(&analysis.usage) {
            Ok(df) => println!("{}", usage_table(&df)),
            Err(error) => eprintln!("error: {error:#}"),
        }
    }

    if analysis.has_treatment_summary() {
        for summary in &analysis.summaries {
            println!("{}", summary.dimension.title());
            match summary_frame(summary) {
                Ok(df) => println!("{}", frame_table(&df)),
                Err(error) => eprintln!("error: {error:#}"),
            }
        }
    } else {
        println!("{NO_TREATMENTS}");
    }

    if !analysis.issues.is_empty() {
        println!("Filas excluidas por fecha no válida: {}", analysis.issues.len());
    }
    for path in &outcome.outputs {
        println!("Escrito {}", path.display());
    }
}

fn print_overview(result: &AnalyzeResult) {
    println!("{}", overview_table(result));
    println!(
        "Análisis: {} calculados, {} reutilizados",
        result.cache_misses, result.cache_hits
    );
}

/// One row per requested device.
fn overview_table(result: &AnalyzeResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("DIN"),
        header_cell("Fecha de corte"),
        header_cell("Manípulos"),
        header_cell("Activos"),
        header_cell("Tratamientos"),
        header_cell("Ingresos"),
        header_cell("Ficheros"),
        header_cell("Estado"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in &result.devices {
        let din = Cell::new(&outcome.din)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold);
        match &outcome.analysis {
            Some(analysis) => {
                let active = analysis
                    .usage
                    .iter()
                    .filter(|row| row.status == UsageStatus::Active)
                    .count();
                table.add_row(vec![
                    din,
                    Cell::new(format_for_display(analysis.context.cutoff)),
                    Cell::new(analysis.usage.len()),
                    count_cell(active, Color::Green),
                    Cell::new(analysis.treatments.len()),
                    Cell::new(revenue(analysis)),
                    Cell::new(outcome.outputs.len()),
                    Cell::new("ok").fg(Color::Green),
                ]);
            }
            None => {
                table.add_row(vec![
                    din,
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    Cell::new("error")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                ]);
            }
        }
    }
    table
}

/// Revenue of the counted first-step treatments.
fn revenue(analysis: &DeviceAnalysis) -> f64 {
    analysis
        .summary(SummaryDimension::Category)
        .map_or(0.0, |summary| summary.total_revenue())
}

fn usage_table(df: &DataFrame) -> Table {
    let mut table = frame_table(df);
    if let Some(column) = df
        .get_column_names()
        .iter()
        .position(|name| name.as_str() == COL_STATUS)
    {
        align_column(&mut table, column, CellAlignment::Center);
    }
    table
}

/// Renders a presentation frame; numeric columns are right-aligned.
fn frame_table(df: &DataFrame) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in 0..df.height() {
        let cells = df
            .get_columns()
            .iter()
            .map(|column| match column.get(row) {
                Ok(AnyValue::Null) | Err(_) => dim_cell("-"),
                Ok(AnyValue::String(value)) => Cell::new(value),
                Ok(value) => Cell::new(value),
            })
            .collect::<Vec<_>>();
        table.add_row(cells);
    }
    for (index, column) in df.get_columns().iter().enumerate() {
        if matches!(
            column.dtype(),
            DataType::Float64 | DataType::UInt64 | DataType::Int64
        ) {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use fhos_model::{CutoffContext, SummaryRow, TreatmentSummary};

    use super::*;

    fn analysis() -> DeviceAnalysis {
        let now = Utc
            .with_ymd_and_hms(2024, 10, 20, 12, 0, 0)
            .single()
            .expect("valid now");
        let category = TreatmentSummary {
            dimension: SummaryDimension::Category,
            rows: vec![
                SummaryRow {
                    label: "FHOS".to_string(),
                    count: 2,
                    revenue: 120.0,
                    count_share: 66.67,
                    revenue_share: 82.76,
                },
                SummaryRow {
                    label: "Depilación".to_string(),
                    count: 1,
                    revenue: 25.0,
                    count_share: 33.33,
                    revenue_share: 17.24,
                },
            ],
        };
        DeviceAnalysis {
            context: CutoffContext::new("CM-A30-000001", now),
            now,
            usage: Vec::new(),
            treatments: Vec::new(),
            summaries: vec![
                category,
                TreatmentSummary::empty(SummaryDimension::Program),
                TreatmentSummary::empty(SummaryDimension::Subprogram),
            ],
            issues: Vec::new(),
        }
    }

    #[test]
    fn revenue_totals_the_category_summary() {
        assert_eq!(revenue(&analysis()), 145.0);
        let mut empty = analysis();
        empty.summaries.clear();
        assert_eq!(revenue(&empty), 0.0);
    }

    #[test]
    fn overview_lists_every_device() {
        let result = AnalyzeResult {
            data_dir: PathBuf::from("data"),
            output_dir: None,
            fingerprint: String::new(),
            devices: vec![
                DeviceOutcome {
                    din: "CM-A30-000001".to_string(),
                    analysis: Some(Arc::new(analysis())),
                    outputs: Vec::new(),
                    error: None,
                },
                DeviceOutcome {
                    din: "CM-A30-000002".to_string(),
                    analysis: None,
                    outputs: Vec::new(),
                    error: Some("cutoff out of range".to_string()),
                },
            ],
            cache_hits: 0,
            cache_misses: 1,
        };

        let rendered = overview_table(&result).to_string();

        for header in ["Fecha de corte", "Manípulos", "Activos", "Ingresos", "Estado"] {
            assert!(rendered.contains(header), "missing header {header}");
        }
        assert!(rendered.contains("145"));
        assert!(rendered.contains("CM-A30-000002"));
        assert!(rendered.contains("error"));
    }
}
