//! Handpiece class from the raw identifier.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use fhos_model::DeviceClass;

/// Identifiers ending in `1` plus one digit (`...19`).
static MAIN_FUNCTION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"1\d$").expect("Invalid main-function suffix regex"));

/// Identifiers ending in `2` plus one digit (`...29`).
static SECONDARY_FUNCTION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2\d$").expect("Invalid secondary-function suffix regex"));

/// Classifies a raw handpiece identifier by its last two characters.
pub fn classify_handpiece(raw: &str) -> DeviceClass {
    if MAIN_FUNCTION_SUFFIX.is_match(raw) {
        DeviceClass::MainFunction
    } else if SECONDARY_FUNCTION_SUFFIX.is_match(raw) {
        DeviceClass::SecondaryFunction
    } else {
        DeviceClass::Unidentified
    }
}

/// Classifies any displayable value, e.g. an identifier exported as a number.
pub fn classify_value(raw: &impl fmt::Display) -> DeviceClass {
    classify_handpiece(&raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_suffix() {
        assert_eq!(classify_handpiece("XYZ-19"), DeviceClass::MainFunction);
        assert_eq!(classify_handpiece("ABC119"), DeviceClass::MainFunction);
        assert_eq!(classify_handpiece("XYZ-29"), DeviceClass::SecondaryFunction);
        assert_eq!(classify_handpiece("ABC229"), DeviceClass::SecondaryFunction);
        assert_eq!(classify_handpiece("XYZ-00"), DeviceClass::Unidentified);
        assert_eq!(classify_handpiece("ABC999"), DeviceClass::Unidentified);
    }

    #[test]
    fn tolerates_short_and_malformed_input() {
        assert_eq!(classify_handpiece(""), DeviceClass::Unidentified);
        assert_eq!(classify_handpiece("1"), DeviceClass::Unidentified);
        assert_eq!(classify_handpiece("12"), DeviceClass::MainFunction);
        assert_eq!(classify_handpiece("HP-1X"), DeviceClass::Unidentified);
        assert_eq!(classify_handpiece("HP-19 "), DeviceClass::Unidentified);
    }

    #[test]
    fn coerces_non_string_identifiers() {
        assert_eq!(classify_value(&4419_u32), DeviceClass::MainFunction);
        assert_eq!(classify_value(&27_i64), DeviceClass::SecondaryFunction);
        assert_eq!(classify_value(&7.5_f64), DeviceClass::Unidentified);
    }
}
