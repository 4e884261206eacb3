//! Cell conversion from Polars `AnyValue`s.
//!
//! Source frames may arrive with inferred dtypes or as plain strings. Every
//! helper here accepts both, so record extraction does not depend on how a
//! frame was read. Blank cells are `None`; cells with content that cannot be
//! read as the requested type are an error carrying the offending text.

use polars::prelude::AnyValue;

use fhos_model::RawTimestamp;

/// Cell content that should have been numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotNumeric(pub String);

/// Text content of a cell, `None` for nulls, NaN and blank strings.
///
/// Whole floats render without a fractional part, so a numeric identifier
/// read as `119.0` keeps its digits as `119`.
pub fn cell_text(value: &AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(v) if v.is_nan() => return None,
        AnyValue::Float64(v) if v.is_nan() => return None,
        AnyValue::Float32(v) => format_number(f64::from(*v)),
        AnyValue::Float64(v) => format_number(*v),
        other => other.to_string(),
    };
    let trimmed = text.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Join key content of a cell.
///
/// Codes exported through a spreadsheet sometimes pick up a `.0` suffix
/// (`101.0`); those compare equal to the plain integer code.
pub fn cell_code(value: &AnyValue<'_>) -> Option<String> {
    let text = cell_text(value)?;
    match text.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) => {
            Some(digits.to_string())
        }
        _ => Some(text),
    }
}

/// Numeric content of a cell as `f64`.
pub fn cell_number(value: &AnyValue<'_>) -> Result<Option<f64>, NotNumeric> {
    if let Some(number) = native_number(value) {
        return Ok(if number.is_nan() { None } else { Some(number) });
    }
    match cell_text(value) {
        None => Ok(None),
        Some(text) => match text.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(NotNumeric(text)),
        },
    }
}

/// Numeric content of a cell as a whole number.
///
/// Whole floats (`300.0`) are accepted; fractional values are not.
pub fn cell_integer(value: &AnyValue<'_>) -> Result<Option<i64>, NotNumeric> {
    match value {
        AnyValue::Int8(v) => return Ok(Some(i64::from(*v))),
        AnyValue::Int16(v) => return Ok(Some(i64::from(*v))),
        AnyValue::Int32(v) => return Ok(Some(i64::from(*v))),
        AnyValue::Int64(v) => return Ok(Some(*v)),
        AnyValue::UInt8(v) => return Ok(Some(i64::from(*v))),
        AnyValue::UInt16(v) => return Ok(Some(i64::from(*v))),
        AnyValue::UInt32(v) => return Ok(Some(i64::from(*v))),
        AnyValue::UInt64(v) => {
            return i64::try_from(*v)
                .map(Some)
                .map_err(|_| NotNumeric(v.to_string()));
        }
        _ => {}
    }
    let Some(text) = cell_text(value) else {
        return Ok(None);
    };
    if let Ok(whole) = text.parse::<i64>() {
        return Ok(Some(whole));
    }
    match text.parse::<f64>() {
        Ok(number) if number.is_finite() && number.fract() == 0.0 && number.abs() < 9.0e15 => {
            Ok(Some(number as i64))
        }
        _ => Err(NotNumeric(text)),
    }
}

/// Timestamp content of a cell.
///
/// Numeric cells are spreadsheet serials; anything else is kept as text and
/// parsed later by the pipeline.
pub fn cell_timestamp(value: &AnyValue<'_>) -> Option<RawTimestamp> {
    match native_number(value) {
        Some(number) if number.is_nan() => None,
        Some(number) => Some(RawTimestamp::Serial(number)),
        None => cell_text(value).map(RawTimestamp::Text),
    }
}

fn native_number(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_trims_and_drops_blanks() {
        assert_eq!(cell_text(&AnyValue::Null), None);
        assert_eq!(cell_text(&AnyValue::String("   ")), None);
        assert_eq!(
            cell_text(&AnyValue::String(" CM-A30-000001 ")),
            Some("CM-A30-000001".to_string())
        );
        assert_eq!(cell_text(&AnyValue::Int64(119)), Some("119".to_string()));
        assert_eq!(cell_text(&AnyValue::Float64(119.0)), Some("119".to_string()));
        assert_eq!(cell_text(&AnyValue::Float64(f64::NAN)), None);
    }

    #[test]
    fn codes_drop_spreadsheet_suffix() {
        assert_eq!(cell_code(&AnyValue::String("101.0")), Some("101".to_string()));
        assert_eq!(cell_code(&AnyValue::String("101")), Some("101".to_string()));
        assert_eq!(cell_code(&AnyValue::String("FX.0")), Some("FX.0".to_string()));
        assert_eq!(cell_code(&AnyValue::Float64(7.0)), Some("7".to_string()));
    }

    #[test]
    fn numbers_distinguish_blank_from_invalid() {
        assert_eq!(cell_number(&AnyValue::String("")), Ok(None));
        assert_eq!(cell_number(&AnyValue::String("60")), Ok(Some(60.0)));
        assert_eq!(cell_number(&AnyValue::Float64(1.0)), Ok(Some(1.0)));
        assert_eq!(
            cell_number(&AnyValue::String("sesenta")),
            Err(NotNumeric("sesenta".to_string()))
        );
    }

    #[test]
    fn integers_accept_whole_floats_only() {
        assert_eq!(cell_integer(&AnyValue::String("300")), Ok(Some(300)));
        assert_eq!(cell_integer(&AnyValue::String("300.0")), Ok(Some(300)));
        assert_eq!(cell_integer(&AnyValue::Int32(-4)), Ok(Some(-4)));
        assert_eq!(cell_integer(&AnyValue::Null), Ok(None));
        assert!(cell_integer(&AnyValue::String("300.5")).is_err());
        assert!(cell_integer(&AnyValue::String("n/a")).is_err());
    }

    #[test]
    fn timestamps_keep_text_and_serials_apart() {
        assert_eq!(
            cell_timestamp(&AnyValue::String("2024-10-01 08:00:00")),
            Some(RawTimestamp::Text("2024-10-01 08:00:00".to_string()))
        );
        assert_eq!(
            cell_timestamp(&AnyValue::Float64(45200.5)),
            Some(RawTimestamp::Serial(45200.5))
        );
        assert_eq!(cell_timestamp(&AnyValue::Null), None);
    }
}
