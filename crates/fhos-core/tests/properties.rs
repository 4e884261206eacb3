//! Property tests for classification, service life, filtering and summaries.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fhos_core::{
    classify_handpiece, estimate_service_life, filter_since, summarize, summarize_all,
};
use fhos_model::{
    DeviceClass, JoinedTreatment, RawTimestamp, ServiceLife, SummaryDimension, TreatmentRecord,
    UsageCounters,
};
use proptest::prelude::*;

fn counters(pulse: i64, burst: i64, activation: i64, modulation: i64) -> UsageCounters {
    UsageCounters {
        pulse: Some(pulse),
        burst: Some(burst),
        activation: Some(activation),
        modulation: Some(modulation),
    }
}

fn percent(life: ServiceLife) -> f64 {
    life.percent().expect("identified class has a percentage")
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid base")
}

fn itself(raw: &RawTimestamp) -> Option<&RawTimestamp> {
    Some(raw)
}

fn joined(label: String, price: f64, first_step: bool) -> JoinedTreatment {
    JoinedTreatment {
        record: TreatmentRecord {
            din: "D1".to_string(),
            code: "1".to_string(),
            reported_at: None,
            duration_ms: None,
        },
        category: label.clone(),
        program: Some(label.clone()),
        subprogram: label,
        price,
        sequence: if first_step { 1.0 } else { 2.0 },
    }
}

fn class_strategy() -> impl Strategy<Value = DeviceClass> {
    prop_oneof![
        Just(DeviceClass::MainFunction),
        Just(DeviceClass::SecondaryFunction)
    ]
}

proptest! {
    #[test]
    fn prop_suffix_decides_class(prefix in "[A-Z-]{0,6}[0-9]?", last in 0u8..10) {
        prop_assert_eq!(
            classify_handpiece(&format!("{prefix}1{last}")),
            DeviceClass::MainFunction
        );
        prop_assert_eq!(
            classify_handpiece(&format!("{prefix}2{last}")),
            DeviceClass::SecondaryFunction
        );
        prop_assert_eq!(
            classify_handpiece(&format!("{prefix}9{last}")),
            DeviceClass::Unidentified
        );
    }

    #[test]
    fn prop_remaining_life_is_bounded(
        class in class_strategy(),
        pulse in 0i64..1_000_000,
        burst in 0i64..10_000_000,
        activation in 0i64..10_000_000,
        modulation in 0i64..10_000_000,
    ) {
        let value = percent(estimate_service_life(
            class,
            &counters(pulse, burst, activation, modulation),
        ));
        prop_assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn prop_remaining_life_never_increases_with_usage(
        class in class_strategy(),
        base in (0i64..500_000, 0i64..5_000_000, 0i64..5_000_000, 0i64..5_000_000),
        extra in 0i64..1_000_000,
        counter in 0usize..4,
    ) {
        let (pulse, burst, activation, modulation) = base;
        let before = counters(pulse, burst, activation, modulation);
        let mut after = before;
        match counter {
            0 => after.pulse = after.pulse.map(|v| v + extra),
            1 => after.burst = after.burst.map(|v| v + extra),
            2 => after.activation = after.activation.map(|v| v + extra),
            _ => after.modulation = after.modulation.map(|v| v + extra),
        }
        let before = percent(estimate_service_life(class, &before));
        let after = percent(estimate_service_life(class, &after));
        prop_assert!(after <= before);
    }

    #[test]
    fn prop_cutoff_filter_is_idempotent(
        offsets in prop::collection::vec(0i64..1_000, 0..40),
        cutoff_offset in 0i64..1_000,
    ) {
        let rows: Vec<(usize, RawTimestamp)> = offsets
            .iter()
            .map(|hours| RawTimestamp::Text((base() + Duration::hours(*hours)).to_rfc3339()))
            .enumerate()
            .collect();
        let cutoff = base() + Duration::hours(cutoff_offset);

        let once = filter_since(rows, cutoff, "test", itself);
        let again = filter_since(
            once.rows.iter().map(|d| d.row.clone()).enumerate(),
            cutoff,
            "test",
            itself,
        );
        prop_assert_eq!(&once.rows, &again.rows);
        prop_assert!(once.rows.iter().all(|d| d.at >= cutoff));
    }

    #[test]
    fn prop_shares_sum_to_one_hundred(
        rows in prop::collection::vec(("[a-e]", 1u32..200, any::<bool>()), 1..60),
    ) {
        let rows: Vec<JoinedTreatment> = rows
            .into_iter()
            .map(|(label, price, first)| joined(label, f64::from(price), first))
            .collect();
        for summary in summarize_all(&rows) {
            if summary.is_empty() {
                continue;
            }
            let count: f64 = summary.rows.iter().map(|r| r.count_share).sum();
            let revenue: f64 = summary.rows.iter().map(|r| r.revenue_share).sum();
            prop_assert!((count - 100.0).abs() <= 0.1, "count shares sum to {}", count);
            prop_assert!((revenue - 100.0).abs() <= 0.1, "revenue shares sum to {}", revenue);
        }
    }

    #[test]
    fn prop_summary_counts_first_steps_only(
        rows in prop::collection::vec(("[a-c]", any::<bool>()), 0..40),
    ) {
        let rows: Vec<JoinedTreatment> = rows
            .into_iter()
            .map(|(label, first)| joined(label, 60.0, first))
            .collect();
        let expected = rows.iter().filter(|r| r.sequence == 1.0).count();
        let summary = summarize(&rows, SummaryDimension::Category);
        prop_assert_eq!(summary.total_count(), expected);
        let counts: Vec<_> = summary.rows.iter().map(|r| r.count).collect();
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }
}
