//! Aggregated treatment summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grouping dimension of a treatment summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryDimension {
    /// Treatment type (`Tipo`).
    Category,
    /// Program (`Subtipo`).
    Program,
    /// Subprogram (`Subprograma`).
    Subprogram,
}

impl SummaryDimension {
    /// Every dimension, in report order.
    pub const ALL: [SummaryDimension; 3] = [
        SummaryDimension::Category,
        SummaryDimension::Program,
        SummaryDimension::Subprogram,
    ];

    /// Column label of the dimension in report tables.
    pub fn column_label(&self) -> &'static str {
        match self {
            SummaryDimension::Category => "Tipo",
            SummaryDimension::Program => "Subtipo",
            SummaryDimension::Subprogram => "Subprograma",
        }
    }

    /// Section heading used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            SummaryDimension::Category => "Resumen de Tratamientos",
            SummaryDimension::Program => "Resumen por Programa",
            SummaryDimension::Subprogram => "Resumen por Subprogramas",
        }
    }

    /// Short key used in exported file names.
    pub fn file_key(&self) -> &'static str {
        match self {
            SummaryDimension::Category => "tipo",
            SummaryDimension::Program => "programa",
            SummaryDimension::Subprogram => "subprograma",
        }
    }
}

impl fmt::Display for SummaryDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_label())
    }
}

/// One group of a treatment summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    /// Number of first-step treatments in the group.
    pub count: usize,
    /// Summed unit price of those treatments.
    pub revenue: f64,
    /// Share of all counted treatments, rounded to 2 decimals.
    pub count_share: f64,
    /// Share of all revenue, rounded to 2 decimals.
    pub revenue_share: f64,
}

/// Treatment counts and revenue grouped by one dimension, largest group first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentSummary {
    pub dimension: SummaryDimension,
    pub rows: Vec<SummaryRow>,
}

impl TreatmentSummary {
    pub fn empty(dimension: SummaryDimension) -> Self {
        Self {
            dimension,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|row| row.revenue).sum()
    }
}
