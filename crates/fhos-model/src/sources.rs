use crate::cutoff::CutoffHint;
use crate::records::HandpieceRecord;
use crate::treatment::{TreatmentLookup, TreatmentRecord};

/// The four source datasets, loaded once and treated as immutable.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub handpieces: Vec<HandpieceRecord>,
    pub cutoff_hints: Vec<CutoffHint>,
    pub treatments: Vec<TreatmentRecord>,
    pub lookup: TreatmentLookup,
    /// Hex SHA-256 over the source files' bytes; identifies this snapshot.
    pub fingerprint: String,
}

impl SourceTables {
    /// Cutoff hint for a unit, if the hint table lists it.
    pub fn cutoff_hint(&self, din: &str) -> Option<&CutoffHint> {
        self.cutoff_hints.iter().find(|hint| hint.din == din)
    }

    /// Whether any handpiece or treatment row belongs to the unit.
    pub fn knows_device(&self, din: &str) -> bool {
        self.handpieces.iter().any(|record| record.din == din)
            || self.treatments.iter().any(|record| record.din == din)
    }
}
