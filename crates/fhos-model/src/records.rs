//! Source records for handpiece usage and the rows derived from them.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceClass, ServiceLife, UsageStatus};

/// A timestamp exactly as it arrived from a source table.
///
/// Normalization to a UTC instant happens in the pipeline, so parse failures
/// can be reported per row instead of failing the whole load.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    /// ISO-8601 style text, zoned or naive.
    Text(String),
    /// Spreadsheet day count since 1899-12-30.
    Serial(f64),
    /// Pre-parsed instant without zone information.
    Naive(NaiveDateTime),
    /// Pre-parsed instant with an explicit offset.
    Zoned(DateTime<FixedOffset>),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::Text(value) => f.write_str(value),
            RawTimestamp::Serial(value) => write!(f, "{value}"),
            RawTimestamp::Naive(value) => write!(f, "{value}"),
            RawTimestamp::Zoned(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

/// Usage counters reported by a handpiece.
///
/// Values stay optional so an empty source cell is isolated to its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    pub pulse: Option<i64>,
    pub burst: Option<i64>,
    pub activation: Option<i64>,
    pub modulation: Option<i64>,
}

/// One row of the handpiece connection log.
#[derive(Debug, Clone, PartialEq)]
pub struct HandpieceRecord {
    /// Identifier of the FHOS unit the handpiece was connected to.
    pub din: String,
    /// Raw handpiece identifier; its suffix encodes the [`DeviceClass`].
    pub handpiece_id: String,
    pub serial_number: String,
    /// Last time the unit reported this handpiece.
    pub created_at: Option<RawTimestamp>,
    /// Raw counters, pulse not yet rescaled.
    pub counters: UsageCounters,
}

/// A handpiece row after counter normalization, classification and
/// service-life estimation, before any date filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct HandpieceUsage {
    pub din: String,
    pub device_class: DeviceClass,
    pub serial_number: String,
    pub last_seen: Option<RawTimestamp>,
    /// Counters with the pulse counter rescaled.
    pub counters: UsageCounters,
    pub service_life: ServiceLife,
}

/// One row of the device-usage table handed to presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceUsageRow {
    pub last_seen: DateTime<Utc>,
    pub status: UsageStatus,
    pub din: String,
    pub device_class: DeviceClass,
    pub serial_number: String,
    pub service_life: ServiceLife,
    pub counters: UsageCounters,
}

/// A row paired with its normalized timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Dated<T> {
    pub at: DateTime<Utc>,
    pub row: T,
}

/// A row excluded from a filtered view because its timestamp was unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// Which table the row came from.
    pub source: String,
    /// Zero-based position of the row in its input batch.
    pub row_index: usize,
    /// Offending raw value (empty when the cell was missing).
    pub value: String,
    pub reason: String,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {}: {} ('{}')",
            self.source, self.row_index, self.reason, self.value
        )
    }
}
