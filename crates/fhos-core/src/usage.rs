//! Usage normalization of raw handpiece rows.

use fhos_model::{HandpieceRecord, HandpieceUsage, UsageCounters};

use crate::identity::classify_handpiece;
use crate::service_life::estimate_service_life;

/// Divisor applied to the raw pulse counter.
pub const PULSE_DIVISOR: i64 = 3;

/// Rescales a raw pulse counter to firing units, rounded to the nearest
/// integer.
///
/// A third never lands exactly on `.5`, so nearest rounding here agrees with
/// half-to-even rounding of the float quotient.
pub fn rescale_pulse(raw: i64) -> i64 {
    let quotient = raw.div_euclid(PULSE_DIVISOR);
    if raw.rem_euclid(PULSE_DIVISOR) * 2 > PULSE_DIVISOR {
        quotient + 1
    } else {
        quotient
    }
}

/// Rescaled counters; missing counters stay missing.
pub fn normalize_counters(raw: UsageCounters) -> UsageCounters {
    UsageCounters {
        pulse: raw.pulse.map(rescale_pulse),
        ..raw
    }
}

/// Builds the usage view of one handpiece row: class, rescaled counters and
/// the service-life estimate derived from them.
pub fn normalize_usage(record: &HandpieceRecord) -> HandpieceUsage {
    let device_class = classify_handpiece(&record.handpiece_id);
    let counters = normalize_counters(record.counters);
    HandpieceUsage {
        din: record.din.clone(),
        device_class,
        serial_number: record.serial_number.clone(),
        last_seen: record.created_at.clone(),
        counters,
        service_life: estimate_service_life(device_class, &counters),
    }
}
