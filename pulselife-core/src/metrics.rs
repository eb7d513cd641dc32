//! Derived device metrics
//!
//! Global invariants enforced:
//! - Deterministic, pure calculation from a Configuration
//! - battery_years in [0, 10] with one decimal place
//! - security_score and accessibility_score in [0, 100]

use crate::configuration::Configuration;
use serde::{Deserialize, Serialize};

/// Device lifetime with every dial at zero
pub const BASE_BATTERY_YEARS: f64 = 10.0;

/// Lifetime a single dial can drain at 100%
pub const MAX_DIAL_DRAIN_YEARS: f64 = 4.0;

/// Snapshot of the scores derived from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub battery_years: f64,
    pub security_score: u8,
    pub accessibility_score: u8,
}

/// Compute metrics from a configuration
///
/// Formulas:
/// - battery = max(0, round1(10 - enc/100 * 4 - samp/100 * 4))
/// - security = clamp(round(enc * 0.7 + (100 - access) * 0.3))
/// - accessibility = clamp(round(access * 0.9 - enc * 0.1))
pub fn compute_metrics(config: &Configuration) -> Metrics {
    let encryption = config.encryption() as f64;
    let access = config.access() as f64;
    let sampling = config.sampling() as f64;

    let encryption_drain = (encryption / 100.0) * MAX_DIAL_DRAIN_YEARS;
    let sampling_drain = (sampling / 100.0) * MAX_DIAL_DRAIN_YEARS;
    let battery_years = round1(BASE_BATTERY_YEARS - encryption_drain - sampling_drain).max(0.0);

    let security = encryption * 0.7 + (100.0 - access) * 0.3;
    let accessibility = access * 0.9 - encryption * 0.1;

    Metrics {
        battery_years,
        security_score: to_score(security),
        accessibility_score: to_score(accessibility),
    }
}

/// Round to one decimal place, halves away from zero
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp into [0, 100] then round half up
fn to_score(raw: f64) -> u8 {
    // Non-negative after the clamp, so round() is half-up here
    raw.clamp(0.0, 100.0).round() as u8
}
