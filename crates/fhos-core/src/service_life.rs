//! Remaining service life of a handpiece.
//!
//! Each identified class has a rated capacity in weighted usage units.
//! Pulses wear a handpiece far more than bursts, and activation plus
//! modulation cycles count fully on main-function handpieces but half on
//! secondary-function ones.

use fhos_model::{DeviceClass, ServiceLife, UsageCounters};

/// Rated capacity and counter weights of one handpiece class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityProfile {
    pub capacity: f64,
    pub pulse_weight: f64,
    pub burst_weight: f64,
    /// Weight of `activation + modulation`.
    pub cycle_weight: f64,
}

pub const MAIN_FUNCTION_PROFILE: CapacityProfile = CapacityProfile {
    capacity: 4_000_000.0,
    pulse_weight: 20.0,
    burst_weight: 1.0,
    cycle_weight: 1.0,
};

pub const SECONDARY_FUNCTION_PROFILE: CapacityProfile = CapacityProfile {
    capacity: 2_000_000.0,
    pulse_weight: 10.0,
    burst_weight: 1.0,
    cycle_weight: 0.5,
};

/// Capacity profile of a class; unidentified handpieces have none.
pub fn capacity_profile(class: DeviceClass) -> Option<CapacityProfile> {
    match class {
        DeviceClass::MainFunction => Some(MAIN_FUNCTION_PROFILE),
        DeviceClass::SecondaryFunction => Some(SECONDARY_FUNCTION_PROFILE),
        DeviceClass::Unidentified => None,
    }
}

impl CapacityProfile {
    /// Weighted consumption, or `None` when a counter is missing or negative.
    pub fn consumed(&self, counters: &UsageCounters) -> Option<f64> {
        let pulse = non_negative(counters.pulse)?;
        let burst = non_negative(counters.burst)?;
        let activation = non_negative(counters.activation)?;
        let modulation = non_negative(counters.modulation)?;
        let consumed = pulse * self.pulse_weight
            + burst * self.burst_weight
            + (activation + modulation) * self.cycle_weight;
        consumed.is_finite().then_some(consumed)
    }

    /// Remaining life for the given counters.
    pub fn remaining(&self, counters: &UsageCounters) -> ServiceLife {
        let Some(consumed) = self.consumed(counters) else {
            return ServiceLife::Error;
        };
        let remaining = self.capacity - consumed;
        if remaining <= 0.0 {
            return ServiceLife::Depleted;
        }
        let percent = remaining / self.capacity * 100.0;
        if percent.is_finite() {
            ServiceLife::Remaining(percent)
        } else {
            ServiceLife::Error
        }
    }
}

fn non_negative(counter: Option<i64>) -> Option<f64> {
    counter.filter(|value| *value >= 0).map(|value| value as f64)
}

/// Estimates remaining service life. Faults on the row yield
/// [`ServiceLife::Error`] for that row only.
pub fn estimate_service_life(class: DeviceClass, counters: &UsageCounters) -> ServiceLife {
    match capacity_profile(class) {
        Some(profile) => profile.remaining(counters),
        None => ServiceLife::Unidentified,
    }
}
