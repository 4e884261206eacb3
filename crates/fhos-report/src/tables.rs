//! Presentation tables.
//!
//! Each table is a Polars `DataFrame` with the Spanish column names the
//! reports use. Instants are already formatted for display.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};

use fhos_core::format_for_display;
use fhos_model::{Dated, DeviceUsageRow, JoinedTreatment, TreatmentSummary};

// === Device usage ===
pub const COL_LAST_SEEN: &str = "fecha_uso";
pub const COL_STATUS: &str = "estado";
pub const COL_DIN: &str = "din";
pub const COL_HANDPIECE_TYPE: &str = "tipo_manipulo";
pub const COL_SERIAL: &str = "numero_serie";
pub const COL_SERVICE_LIFE: &str = "vida_util";
pub const COL_PULSE: &str = "pulso";
pub const COL_BURST: &str = "rafaga";
pub const COL_ACTIVATION: &str = "activacion";
pub const COL_MODULATION: &str = "modulacion";

// === Summaries ===
pub const COL_COUNT: &str = "Cantidad";
pub const COL_REVENUE: &str = "PVP";
pub const COL_COUNT_SHARE: &str = "% de Tratamientos";
pub const COL_REVENUE_SHARE: &str = "% de Ingresos";

// === Treatment detail ===
pub const COL_REPORTED_AT: &str = "reported_at";
pub const COL_CODE: &str = "code";
pub const COL_CATEGORY: &str = "Tipo";
pub const COL_SUBPROGRAM: &str = "Subprograma";
pub const COL_DURATION: &str = "duration";

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Device-usage table, one row per handpiece, in the order given.
pub fn usage_frame(rows: &[DeviceUsageRow]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            COL_LAST_SEEN.into(),
            rows.iter()
                .map(|r| format_for_display(r.last_seen))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_STATUS.into(),
            rows.iter().map(|r| r.status.label()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_DIN.into(),
            rows.iter().map(|r| r.din.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_HANDPIECE_TYPE.into(),
            rows.iter().map(|r| r.device_class.label()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_SERIAL.into(),
            rows.iter().map(|r| r.serial_number.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_SERVICE_LIFE.into(),
            rows.iter()
                .map(|r| r.service_life.to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_PULSE.into(),
            rows.iter().map(|r| r.counters.pulse).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_BURST.into(),
            rows.iter().map(|r| r.counters.burst).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_ACTIVATION.into(),
            rows.iter().map(|r| r.counters.activation).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_MODULATION.into(),
            rows.iter().map(|r| r.counters.modulation).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build device usage table")
}

/// Summary table; the first column is named after the dimension.
pub fn summary_frame(summary: &TreatmentSummary) -> Result<DataFrame> {
    let rows = &summary.rows;
    let columns = vec![
        Column::new(
            summary.dimension.column_label().into(),
            rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_COUNT.into(),
            rows.iter().map(|r| r.count as u64).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_REVENUE.into(),
            rows.iter().map(|r| r.revenue).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_COUNT_SHARE.into(),
            rows.iter().map(|r| r.count_share).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_REVENUE_SHARE.into(),
            rows.iter().map(|r| r.revenue_share).collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns)
        .with_context(|| format!("build {} summary table", summary.dimension))
}

/// Duration in minutes, two decimals.
pub fn duration_minutes(duration_ms: Option<i64>) -> Option<f64> {
    duration_ms.map(|ms| (ms as f64 / MILLIS_PER_MINUTE * 100.0).round_ties_even() / 100.0)
}

/// Treatment detail table, in the order given.
pub fn detail_frame(treatments: &[Dated<JoinedTreatment>]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            COL_REPORTED_AT.into(),
            treatments
                .iter()
                .map(|t| format_for_display(t.at))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_CODE.into(),
            treatments
                .iter()
                .map(|t| t.row.record.code.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_CATEGORY.into(),
            treatments
                .iter()
                .map(|t| t.row.category.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_SUBPROGRAM.into(),
            treatments
                .iter()
                .map(|t| t.row.subprogram.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            COL_DURATION.into(),
            treatments
                .iter()
                .map(|t| duration_minutes(t.row.record.duration_ms))
                .collect::<Vec<_>>(),
        ),
    ];
    DataFrame::new(columns).context("build treatment detail table")
}
