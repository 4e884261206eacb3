//! Left join of treatment events against the treatment-type lookup.

use fhos_model::{JoinedTreatment, TreatmentLookup, TreatmentRecord};

/// Category of a treatment with no lookup entry or no category.
pub const DEFAULT_CATEGORY: &str = "FHOS";
/// Subprogram of a treatment with no lookup entry or no subprogram.
pub const DEFAULT_SUBPROGRAM: &str = "FHOS genérico";
/// Unit price applied when the lookup has none.
pub const DEFAULT_PRICE: f64 = 60.0;
/// Sequence step applied when the lookup has none.
pub const DEFAULT_SEQUENCE: f64 = 1.0;

/// Joins one treatment event. Unmatched codes get the defaults; the program
/// has no default and stays empty.
pub fn join_treatment(record: &TreatmentRecord, lookup: &TreatmentLookup) -> JoinedTreatment {
    let entry = lookup.get(&record.code);
    JoinedTreatment {
        record: record.clone(),
        category: entry
            .and_then(|e| e.category.clone())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        program: entry.and_then(|e| e.program.clone()),
        subprogram: entry
            .and_then(|e| e.subprogram.clone())
            .unwrap_or_else(|| DEFAULT_SUBPROGRAM.to_string()),
        price: entry.and_then(|e| e.price).unwrap_or(DEFAULT_PRICE),
        sequence: entry.and_then(|e| e.sequence).unwrap_or(DEFAULT_SEQUENCE),
    }
}

/// Joins every event; none is dropped.
pub fn join_treatments<'a>(
    records: impl IntoIterator<Item = &'a TreatmentRecord>,
    lookup: &TreatmentLookup,
) -> Vec<JoinedTreatment> {
    records
        .into_iter()
        .map(|record| join_treatment(record, lookup))
        .collect()
}

#[cfg(test)]
mod tests {
    use fhos_model::TreatmentType;

    use super::*;

    fn record(code: &str) -> TreatmentRecord {
        TreatmentRecord {
            din: "D1".to_string(),
            code: code.to_string(),
            reported_at: None,
            duration_ms: Some(60_000),
        }
    }

    fn lookup() -> TreatmentLookup {
        [
            TreatmentType {
                code: "101".to_string(),
                category: Some("Facial".to_string()),
                program: Some("Rejuvenecimiento".to_string()),
                subprogram: Some("Activación".to_string()),
                price: Some(80.0),
                sequence: Some(2.0),
            },
            TreatmentType {
                code: "102".to_string(),
                category: None,
                program: None,
                subprogram: None,
                price: None,
                sequence: None,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn matched_codes_take_lookup_values() {
        let joined = join_treatment(&record("101"), &lookup());
        assert_eq!(joined.category, "Facial");
        assert_eq!(joined.program.as_deref(), Some("Rejuvenecimiento"));
        assert_eq!(joined.subprogram, "Activación");
        assert_eq!(joined.price, 80.0);
        assert_eq!(joined.sequence, 2.0);
    }

    #[test]
    fn unmatched_codes_are_kept_with_defaults() {
        let records = [record("999"), record("101")];
        let joined = join_treatments(&records, &lookup());
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].record.code, "999");
        assert_eq!(joined[0].category, DEFAULT_CATEGORY);
        assert_eq!(joined[0].subprogram, DEFAULT_SUBPROGRAM);
        assert_eq!(joined[0].price, DEFAULT_PRICE);
        assert_eq!(joined[0].sequence, DEFAULT_SEQUENCE);
        assert_eq!(joined[0].program, None);
    }

    #[test]
    fn blank_lookup_fields_are_filled() {
        let joined = join_treatment(&record("102"), &lookup());
        assert_eq!(joined.category, DEFAULT_CATEGORY);
        assert_eq!(joined.price, DEFAULT_PRICE);
        assert_eq!(joined.sequence, DEFAULT_SEQUENCE);
    }
}
