//! Treatment events and the treatment-type reference table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::records::RawTimestamp;
use crate::summary::SummaryDimension;

/// One treatment event reported by an FHOS unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentRecord {
    pub din: String,
    /// Treatment code, joined against [`TreatmentType::code`].
    pub code: String,
    pub reported_at: Option<RawTimestamp>,
    /// Duration in milliseconds.
    pub duration_ms: Option<i64>,
}

/// Reference metadata for one treatment code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentType {
    pub code: String,
    /// Treatment type (`Tipo`).
    pub category: Option<String>,
    /// Program (`Subtipo`).
    pub program: Option<String>,
    /// Subprogram (`Subprograma`).
    pub subprogram: Option<String>,
    /// Unit price (`PVP`).
    pub price: Option<f64>,
    /// Sequence step (`Secuencia`); 1.0 is the billable first step.
    pub sequence: Option<f64>,
}

/// Treatment-type table keyed by code.
///
/// Immutable once loaded. The first entry for a code wins.
#[derive(Debug, Clone, Default)]
pub struct TreatmentLookup {
    entries: HashMap<String, TreatmentType>,
}

impl TreatmentLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry unless its code is already present.
    ///
    /// Returns `false` when the code was a duplicate and the entry was ignored.
    pub fn insert(&mut self, entry: TreatmentType) -> bool {
        if self.entries.contains_key(&entry.code) {
            return false;
        }
        self.entries.insert(entry.code.clone(), entry);
        true
    }

    pub fn get(&self, code: &str) -> Option<&TreatmentType> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TreatmentType> for TreatmentLookup {
    fn from_iter<I: IntoIterator<Item = TreatmentType>>(iter: I) -> Self {
        let mut lookup = TreatmentLookup::new();
        for entry in iter {
            lookup.insert(entry);
        }
        lookup
    }
}

/// A treatment event after the left join against [`TreatmentLookup`],
/// with defaults filled for missing reference fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTreatment {
    pub record: TreatmentRecord,
    pub category: String,
    /// Left empty when the code has no program; never defaulted.
    pub program: Option<String>,
    pub subprogram: String,
    pub price: f64,
    pub sequence: f64,
}

impl JoinedTreatment {
    /// Value of the given summary dimension for this treatment.
    pub fn dimension_value(&self, dimension: SummaryDimension) -> Option<&str> {
        match dimension {
            SummaryDimension::Category => Some(self.category.as_str()),
            SummaryDimension::Program => self.program.as_deref(),
            SummaryDimension::Subprogram => Some(self.subprogram.as_str()),
        }
    }
}
