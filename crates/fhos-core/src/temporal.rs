//! Cutoff filtering and recency status.

use chrono::{DateTime, Utc};
use tracing::warn;

use fhos_model::{Dated, DeviceUsageRow, HandpieceUsage, RawTimestamp, RowIssue, UsageStatus};

use crate::datetime::parse_timestamp;

/// A handpiece reported within this many days of `now` is active.
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Rows that passed a cutoff filter, plus the rows rejected for a bad or
/// missing timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered<T> {
    pub rows: Vec<Dated<T>>,
    pub issues: Vec<RowIssue>,
}

impl<T> Default for Filtered<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// Keeps rows whose timestamp is at or after `cutoff`, in input order.
///
/// Each input item carries its row index in `source`, used when a row is
/// rejected. A row whose timestamp is missing or cannot be parsed is
/// excluded and reported; the rest of the batch is unaffected.
pub fn filter_since<T, F>(
    rows: impl IntoIterator<Item = (usize, T)>,
    cutoff: DateTime<Utc>,
    source: &str,
    timestamp: F,
) -> Filtered<T>
where
    F: Fn(&T) -> Option<&RawTimestamp>,
{
    let mut filtered = Filtered::default();
    for (row_index, row) in rows {
        let parsed = match timestamp(&row) {
            None => Err(RowIssue {
                source: source.to_string(),
                row_index,
                value: String::new(),
                reason: "missing timestamp".to_string(),
            }),
            Some(raw) => parse_timestamp(raw).map_err(|e| RowIssue {
                source: source.to_string(),
                row_index,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        };
        match parsed {
            Ok(at) if at >= cutoff => filtered.rows.push(Dated { at, row }),
            Ok(_) => {}
            Err(issue) => {
                warn!(source, row = row_index, value = %issue.value, reason = %issue.reason, "row excluded");
                filtered.issues.push(issue);
            }
        }
    }
    filtered
}

/// Sorts newest first. Rows with equal timestamps keep their order.
pub fn sort_newest_first<T>(rows: &mut [Dated<T>]) {
    rows.sort_by(|a, b| b.at.cmp(&a.at));
}

/// Activity status of a row last seen at `at`, judged at `now`.
pub fn status_at(at: DateTime<Utc>, now: DateTime<Utc>) -> UsageStatus {
    if (now - at).num_days() < ACTIVE_WINDOW_DAYS {
        UsageStatus::Active
    } else {
        UsageStatus::Inactive
    }
}

/// Final device-usage rows, with a status for each.
pub fn usage_rows(rows: Vec<Dated<HandpieceUsage>>, now: DateTime<Utc>) -> Vec<DeviceUsageRow> {
    rows.into_iter()
        .map(|Dated { at, row }| DeviceUsageRow {
            last_seen: at,
            status: status_at(at, now),
            din: row.din,
            device_class: row.device_class,
            serial_number: row.serial_number,
            service_life: row.service_life,
            counters: row.counters,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, day, 0, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn itself(raw: &RawTimestamp) -> Option<&RawTimestamp> {
        Some(raw)
    }

    fn stamped(values: &[&str]) -> Vec<(usize, RawTimestamp)> {
        values
            .iter()
            .map(|v| RawTimestamp::Text((*v).to_string()))
            .enumerate()
            .collect()
    }

    #[test]
    fn keeps_rows_at_or_after_cutoff_in_order() {
        let rows = stamped(&["2024-10-03", "2024-09-30", "2024-10-01", "2024-10-02"]);
        let filtered = filter_since(rows, at(1), "test", itself);
        let kept: Vec<_> = filtered.rows.iter().map(|d| d.at).collect();
        assert_eq!(kept, vec![at(3), at(1), at(2)]);
        assert!(filtered.issues.is_empty());
    }

    #[test]
    fn bad_rows_are_isolated() {
        let mut rows = stamped(&["2024-10-03", "not a date"]);
        rows.push((2, RawTimestamp::Serial(f64::INFINITY)));
        let filtered = filter_since(rows, at(1), "treatments", itself);
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.issues.len(), 2);
        assert_eq!(filtered.issues[0].row_index, 1);
        assert_eq!(filtered.issues[0].source, "treatments");
        assert_eq!(filtered.issues[0].value, "not a date");
    }

    #[test]
    fn missing_timestamps_are_reported() {
        let rows = vec![(0, None::<RawTimestamp>)];
        let filtered = filter_since(rows, at(1), "handpieces", Option::as_ref);
        assert!(filtered.rows.is_empty());
        assert_eq!(filtered.issues[0].reason, "missing timestamp");
    }

    #[test]
    fn sorts_newest_first() {
        let filtered = filter_since(
            stamped(&["2024-10-02", "2024-10-05", "2024-10-03"]),
            at(1),
            "test",
            itself,
        );
        let mut rows = filtered.rows;
        sort_newest_first(&mut rows);
        let order: Vec<_> = rows.iter().map(|d| d.at).collect();
        assert_eq!(order, vec![at(5), at(3), at(2)]);
    }

    #[test]
    fn status_window_is_thirty_days() {
        let now = at(31);
        assert_eq!(status_at(now, now), UsageStatus::Active);
        assert_eq!(status_at(now - Duration::days(29), now), UsageStatus::Active);
        assert_eq!(
            status_at(now - Duration::days(30) + Duration::seconds(1), now),
            UsageStatus::Active
        );
        assert_eq!(status_at(now - Duration::days(30), now), UsageStatus::Inactive);
        assert_eq!(status_at(now + Duration::hours(5), now), UsageStatus::Active);
    }
}
