//! Treatment summaries by category, program and subprogram.
//!
//! Only first-step treatments are counted: a multi-step session bills once.
//! Groups are ordered by count, largest first; groups with equal counts keep
//! the order in which they were first seen.

use std::collections::HashMap;

use fhos_model::{JoinedTreatment, SummaryDimension, SummaryRow, TreatmentSummary};

/// Sequence step that marks the countable step of a session.
pub const FIRST_STEP: f64 = 1.0;

/// Summarizes treatments along one dimension.
///
/// Rows without a value for the dimension are left out. With no qualifying
/// rows the summary is empty.
pub fn summarize<'a>(
    rows: impl IntoIterator<Item = &'a JoinedTreatment>,
    dimension: SummaryDimension,
) -> TreatmentSummary {
    let mut groups: Vec<(String, usize, f64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in rows {
        if row.sequence != FIRST_STEP {
            continue;
        }
        let Some(label) = row.dimension_value(dimension) else {
            continue;
        };
        let position = *positions.entry(label.to_string()).or_insert_with(|| {
            groups.push((label.to_string(), 0, 0.0));
            groups.len() - 1
        });
        let group = &mut groups[position];
        group.1 += 1;
        group.2 += row.price;
    }
    if groups.is_empty() {
        return TreatmentSummary::empty(dimension);
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    let total_count: usize = groups.iter().map(|g| g.1).sum();
    let total_revenue: f64 = groups.iter().map(|g| g.2).sum();
    let rows = groups
        .into_iter()
        .map(|(label, count, revenue)| SummaryRow {
            label,
            count,
            revenue,
            count_share: round_share(count as f64 / total_count as f64 * 100.0),
            revenue_share: if total_revenue == 0.0 {
                0.0
            } else {
                round_share(revenue / total_revenue * 100.0)
            },
        })
        .collect();
    TreatmentSummary { dimension, rows }
}

/// The three summaries, in report order.
pub fn summarize_all<'a, I>(rows: I) -> Vec<TreatmentSummary>
where
    I: IntoIterator<Item = &'a JoinedTreatment> + Clone,
{
    SummaryDimension::ALL
        .into_iter()
        .map(|dimension| summarize(rows.clone(), dimension))
        .collect()
}

/// Two decimals, half to even.
fn round_share(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
