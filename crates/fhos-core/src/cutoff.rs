//! Cutoff selection for a device.
//!
//! Each device may carry a suggested cutoff in the hint table, encoded as a
//! spreadsheet serial. Cutoffs never go earlier than [`CUTOFF_FLOOR`] and a
//! requested cutoff may not lie in the future.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use fhos_model::{CutoffContext, CutoffHint, PipelineError, Result};

use crate::datetime::{spreadsheet_serial_to_datetime, start_of_day};

/// Earliest cutoff date.
pub const CUTOFF_FLOOR: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(date) => date,
    None => panic!("invalid cutoff floor"),
};

/// Suggested cutoff of `din`: the first hint row for the device, converted
/// from its serial, and never earlier than the floor.
pub fn suggested_cutoff(hints: &[CutoffHint], din: &str) -> DateTime<Utc> {
    let floor = start_of_day(CUTOFF_FLOOR);
    let suggested = hints
        .iter()
        .find(|hint| hint.din == din)
        .and_then(|hint| hint.serial)
        .and_then(spreadsheet_serial_to_datetime);
    match suggested {
        Some(at) if at >= floor => at,
        other => {
            debug!(din, hint = ?other, "suggested cutoff falls back to floor");
            floor
        }
    }
}

/// Parses a `YYYY-MM-DD` cutoff argument.
pub fn parse_cutoff_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| PipelineError::InvalidCutoff {
        value: value.to_string(),
    })
}

/// Resolves the cutoff of one analysis.
///
/// A requested date must lie between the floor and `today`. Without one, the
/// suggested cutoff's date is used, capped at `today`. Either way the
/// cutoff is midnight UTC of the chosen date.
pub fn resolve_cutoff(
    din: &str,
    requested: Option<NaiveDate>,
    hints: &[CutoffHint],
    today: NaiveDate,
) -> Result<CutoffContext> {
    if din.trim().is_empty() {
        return Err(PipelineError::EmptyDin);
    }
    let date = match requested {
        Some(date) if date < CUTOFF_FLOOR || date > today => {
            return Err(PipelineError::CutoffOutOfRange {
                date,
                min: CUTOFF_FLOOR,
                max: today,
            });
        }
        Some(date) => date,
        None => suggested_cutoff(hints, din).date_naive().min(today),
    };
    Ok(CutoffContext::new(din, start_of_day(date)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn hint(din: &str, serial: Option<f64>) -> CutoffHint {
        CutoffHint {
            din: din.to_string(),
            serial,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    // 2022-06-01 and 2024-03-15 as spreadsheet serials.
    const SERIAL_2022_06_01: f64 = 44713.0;
    const SERIAL_2024_03_15: f64 = 45366.0;

    #[test]
    fn suggestion_before_floor_is_clamped() {
        let hints = [hint("D1", Some(SERIAL_2022_06_01))];
        assert_eq!(suggested_cutoff(&hints, "D1"), start_of_day(CUTOFF_FLOOR));
    }

    #[test]
    fn suggestion_uses_first_matching_row() {
        let hints = [
            hint("D2", Some(1.0)),
            hint("D1", Some(SERIAL_2024_03_15 + 0.5)),
            hint("D1", Some(SERIAL_2024_03_15 + 10.0)),
        ];
        assert_eq!(
            suggested_cutoff(&hints, "D1"),
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).single().expect("valid")
        );
    }

    #[test]
    fn missing_hint_falls_back_to_floor() {
        let floor = start_of_day(CUTOFF_FLOOR);
        assert_eq!(suggested_cutoff(&[], "D1"), floor);
        assert_eq!(suggested_cutoff(&[hint("D1", None)], "D1"), floor);
        assert_eq!(suggested_cutoff(&[hint("D1", Some(f64::NAN))], "D1"), floor);
    }

    #[test]
    fn resolves_suggested_date_at_midnight() {
        let hints = [hint("D1", Some(SERIAL_2024_03_15 + 0.75))];
        let context = resolve_cutoff("D1", None, &hints, date(2024, 10, 1)).expect("resolve");
        assert_eq!(context.din, "D1");
        assert_eq!(context.cutoff, start_of_day(date(2024, 3, 15)));
    }

    #[test]
    fn future_suggestion_is_capped_at_today() {
        let hints = [hint("D1", Some(SERIAL_2024_03_15))];
        let context = resolve_cutoff("D1", None, &hints, date(2024, 1, 10)).expect("resolve");
        assert_eq!(context.cutoff, start_of_day(date(2024, 1, 10)));
    }

    #[test]
    fn requested_date_must_be_in_range() {
        let today = date(2024, 10, 1);
        let context = resolve_cutoff("D1", Some(date(2024, 5, 1)), &[], today).expect("resolve");
        assert_eq!(context.cutoff, start_of_day(date(2024, 5, 1)));

        assert!(matches!(
            resolve_cutoff("D1", Some(date(2022, 12, 31)), &[], today),
            Err(PipelineError::CutoffOutOfRange { .. })
        ));
        assert!(matches!(
            resolve_cutoff("D1", Some(date(2024, 10, 2)), &[], today),
            Err(PipelineError::CutoffOutOfRange { .. })
        ));
        assert!(resolve_cutoff("D1", Some(CUTOFF_FLOOR), &[], today).is_ok());
        assert!(resolve_cutoff("D1", Some(today), &[], today).is_ok());
    }

    #[test]
    fn empty_din_is_rejected() {
        assert!(matches!(
            resolve_cutoff("  ", None, &[], date(2024, 10, 1)),
            Err(PipelineError::EmptyDin)
        ));
    }

    #[test]
    fn cutoff_literals() {
        assert_eq!(parse_cutoff_date("2024-05-01").expect("parse"), date(2024, 5, 1));
        assert!(matches!(
            parse_cutoff_date("01/05/2024"),
            Err(PipelineError::InvalidCutoff { .. })
        ));
    }
}
