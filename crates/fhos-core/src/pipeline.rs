//! Per-device analysis.
//!
//! Two paths run against the same cutoff and the same `now`:
//!
//! - handpieces: normalize and estimate service life, keep the device's rows
//!   reported since the cutoff, newest first, each with an activity status;
//! - treatments: join against the lookup, keep the device's rows reported
//!   since the cutoff in source order, then summarize.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn};

use fhos_model::{
    CutoffContext, Dated, DeviceUsageRow, JoinedTreatment, PipelineError, Result, RowIssue,
    SourceKind, SourceTables, SummaryDimension, TreatmentSummary,
};

use crate::summary::summarize_all;
use crate::temporal::{filter_since, sort_newest_first, usage_rows};
use crate::treatments::join_treatment;
use crate::usage::normalize_usage;

/// Everything derived for one device and cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceAnalysis {
    pub context: CutoffContext,
    /// Instant the activity statuses were judged against.
    pub now: DateTime<Utc>,
    /// Newest first.
    pub usage: Vec<DeviceUsageRow>,
    /// Source order.
    pub treatments: Vec<Dated<JoinedTreatment>>,
    /// One per dimension, in [`SummaryDimension::ALL`] order.
    pub summaries: Vec<TreatmentSummary>,
    /// Rows excluded for a missing or unparsable timestamp.
    pub issues: Vec<RowIssue>,
}

impl DeviceAnalysis {
    pub fn summary(&self, dimension: SummaryDimension) -> Option<&TreatmentSummary> {
        self.summaries.iter().find(|s| s.dimension == dimension)
    }

    /// Whether any first-step treatment was counted. The summary sections
    /// of a report are only shown when this holds.
    pub fn has_treatment_summary(&self) -> bool {
        self.summary(SummaryDimension::Category)
            .is_some_and(|s| !s.is_empty())
    }
}

/// Analyzes one device.
///
/// Fails only when the device identifier is empty. A device with no rows,
/// before or after filtering, yields an empty analysis.
pub fn analyze_device(
    sources: &SourceTables,
    context: &CutoffContext,
    now: DateTime<Utc>,
) -> Result<DeviceAnalysis> {
    let din = context.din.as_str();
    if din.trim().is_empty() {
        return Err(PipelineError::EmptyDin);
    }
    let span = info_span!("analyze_device", din = %din, cutoff = %context.cutoff);
    let _guard = span.enter();
    if !sources.knows_device(din) {
        warn!("no handpiece or treatment rows for device");
    }
    let start = Instant::now();

    let handpieces = sources
        .handpieces
        .iter()
        .enumerate()
        .filter(|(_, record)| record.din == din)
        .map(|(index, record)| (index, normalize_usage(record)));
    let mut filtered_usage = filter_since(
        handpieces,
        context.cutoff,
        SourceKind::Handpieces.as_str(),
        |usage| usage.last_seen.as_ref(),
    );
    sort_newest_first(&mut filtered_usage.rows);
    let usage = usage_rows(filtered_usage.rows, now);

    let treatments = sources
        .treatments
        .iter()
        .enumerate()
        .filter(|(_, record)| record.din == din)
        .map(|(index, record)| (index, join_treatment(record, &sources.lookup)));
    let filtered_treatments = filter_since(
        treatments,
        context.cutoff,
        SourceKind::Treatments.as_str(),
        |joined| joined.record.reported_at.as_ref(),
    );
    let summaries = summarize_all(filtered_treatments.rows.iter().map(|dated| &dated.row));

    let mut issues = filtered_usage.issues;
    issues.extend(filtered_treatments.issues);

    info!(
        handpieces = usage.len(),
        treatments = filtered_treatments.rows.len(),
        rejected_rows = issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "device analyzed"
    );
    Ok(DeviceAnalysis {
        context: context.clone(),
        now,
        usage,
        treatments: filtered_treatments.rows,
        summaries,
        issues,
    })
}
