//! Handpiece classes and the values derived from them.
//!
//! A handpiece is the detachable applicator connected to an FHOS unit. Its
//! raw identifier encodes the functional class in the last two characters;
//! the class in turn drives the service-life estimate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Functional class of a handpiece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Main-function handpiece: identifier ends in `1` followed by a digit.
    MainFunction,
    /// Secondary-function handpiece: identifier ends in `2` followed by a digit.
    SecondaryFunction,
    /// Identifier matches neither suffix.
    Unidentified,
}

impl DeviceClass {
    /// Label shown in the device-usage table.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceClass::MainFunction => "M.F.",
            DeviceClass::SecondaryFunction => "F.F.",
            DeviceClass::Unidentified => "unidentified",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Activity status of a handpiece relative to the moment of analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageStatus {
    /// Last reported less than 30 days ago.
    Active,
    /// Last reported 30 or more days ago.
    Inactive,
}

impl UsageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UsageStatus::Active => "ACTIVO",
            UsageStatus::Inactive => "INACTIVO",
        }
    }
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated remaining service life of a handpiece.
///
/// Rendered the way the usage table shows it: a percentage with one decimal,
/// `0%` once the rated capacity is exhausted, or a sentinel when no estimate
/// can be made for the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ServiceLife {
    /// Remaining percentage of rated capacity, in `(0, 100]`.
    Remaining(f64),
    /// Consumption reached or exceeded the rated capacity.
    Depleted,
    /// The handpiece class is unknown, so no capacity applies.
    Unidentified,
    /// The row's counters could not be evaluated.
    Error,
}

impl ServiceLife {
    /// Numeric percentage, when one exists.
    pub fn percent(&self) -> Option<f64> {
        match self {
            ServiceLife::Remaining(value) => Some(*value),
            ServiceLife::Depleted => Some(0.0),
            ServiceLife::Unidentified | ServiceLife::Error => None,
        }
    }
}

impl fmt::Display for ServiceLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceLife::Remaining(value) => write!(f, "{value:.1}%"),
            ServiceLife::Depleted => f.write_str("0%"),
            ServiceLife::Unidentified => f.write_str("unidentified"),
            ServiceLife::Error => f.write_str("error"),
        }
    }
}
