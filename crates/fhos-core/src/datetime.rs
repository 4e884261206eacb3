//! Timestamp normalization.
//!
//! Source timestamps arrive as ISO-like strings (with or without an offset),
//! spreadsheet day serials, bare years, or already-parsed values. All of
//! them normalize to a UTC instant; values without a zone are taken to be
//! UTC. Instants go back out through [`format_for_display`] in the fixed
//! display zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use fhos_model::RawTimestamp;

/// Zone all timestamps are rendered in.
pub const DISPLAY_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// Display pattern, e.g. `05/10/24`.
pub const DISPLAY_FORMAT: &str = "%d/%m/%y";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Day zero of spreadsheet serials.
const SERIAL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid serial epoch"),
};

/// Offset-carrying text formats, tried after RFC 3339.
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Naive text formats, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("unrecognized timestamp '{value}'")]
    Unparsable { value: String },

    #[error("spreadsheet serial {serial} is out of range")]
    SerialOutOfRange { serial: f64 },
}

/// Normalizes one raw timestamp to UTC.
pub fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, TimestampError> {
    match raw {
        RawTimestamp::Text(text) => parse_text(text),
        RawTimestamp::Serial(serial) => serial_instant(*serial),
        RawTimestamp::Naive(naive) => Ok(naive.and_utc()),
        RawTimestamp::Zoned(zoned) => Ok(zoned.with_timezone(&Utc)),
    }
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = text.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(zoned.with_timezone(&Utc));
    }
    for format in ZONED_FORMATS {
        if let Ok(zoned) = DateTime::parse_from_str(trimmed, format) {
            return Ok(zoned.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }
    if let Some(date) = year_start(trimmed) {
        return Ok(start_of_day(date));
    }
    // Serials that went through a text column.
    if let Ok(serial) = trimmed.parse::<f64>() {
        return serial_instant(serial);
    }
    Err(TimestampError::Unparsable {
        value: text.to_string(),
    })
}

/// A bare four-digit year reads as January 1st, not as a day serial.
fn year_start(text: &str) -> Option<NaiveDate> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}

fn serial_instant(serial: f64) -> Result<DateTime<Utc>, TimestampError> {
    spreadsheet_serial_to_datetime(serial).ok_or(TimestampError::SerialOutOfRange { serial })
}

/// Converts a spreadsheet day serial (days since 1899-12-30, fractions
/// carrying the time of day) to a UTC instant, to millisecond precision.
pub fn spreadsheet_serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_milliseconds(millis as i64)?;
    SERIAL_EPOCH
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(offset)
        .map(|naive| naive.and_utc())
}

/// Midnight UTC of a calendar date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Renders an instant as a `dd/mm/yy` date in the display zone.
pub fn format_for_display(at: DateTime<Utc>) -> String {
    at.with_timezone(&DISPLAY_TIMEZONE)
        .format(DISPLAY_FORMAT)
        .to_string()
}
