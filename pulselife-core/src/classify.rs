//! Outcome classification
//!
//! Global invariants enforced:
//! - Rules are evaluated in a fixed order, first match wins
//! - Every (Metrics, sampling) pair maps to exactly one Outcome
//! - All comparisons are strict

use crate::metrics::Metrics;
use crate::outcome::Outcome;
use serde::Serialize;

pub const BATTERY_DEATH_YEARS: f64 = 2.0;
pub const LOCKOUT_SECURITY: u8 = 80;
pub const LOCKOUT_ACCESS: u8 = 30;
pub const RANSOMWARE_ACCESS: u8 = 70;
pub const RANSOMWARE_SECURITY: u8 = 40;
pub const PRIVACY_LEAK_ACCESS: u8 = 60;
pub const PRIVACY_LEAK_SECURITY: u8 = 60;
pub const LATENCY_SECURITY: u8 = 80;
pub const LATENCY_ACCESS: u8 = 50;

/// Configurable classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeThresholds {
    /// Battery life below this is a surgical failure (years)
    pub battery_death_years: f64,
    pub lockout_security: u8,
    pub lockout_access: u8,
    pub ransomware_access: u8,
    pub ransomware_security: u8,
    pub privacy_leak_access: u8,
    pub privacy_leak_security: u8,
    pub latency_security: u8,
    pub latency_access: u8,
}

impl Default for OutcomeThresholds {
    fn default() -> Self {
        OutcomeThresholds {
            battery_death_years: BATTERY_DEATH_YEARS,
            lockout_security: LOCKOUT_SECURITY,
            lockout_access: LOCKOUT_ACCESS,
            ransomware_access: RANSOMWARE_ACCESS,
            ransomware_security: RANSOMWARE_SECURITY,
            privacy_leak_access: PRIVACY_LEAK_ACCESS,
            privacy_leak_security: PRIVACY_LEAK_SECURITY,
            latency_security: LATENCY_SECURITY,
            latency_access: LATENCY_ACCESS,
        }
    }
}

/// Classify metrics with default thresholds
pub fn classify(metrics: &Metrics, raw_sampling: u8) -> Outcome {
    classify_with_thresholds(metrics, raw_sampling, &OutcomeThresholds::default())
}

/// Classify metrics with custom thresholds
///
/// Order:
/// 1. sampling == 0 -> ALGORITHM_FAILURE
/// 2. battery < death -> SURGICAL_FAILURE
/// 3. security > 80 && access < 30 -> LOCKOUT_DEATH
/// 4. access > 70 && security < 40 -> RANSOMWARE
/// 5. access > 60 && security < 60 -> PRIVACY_LEAK
/// 6. security > 80 && access < 50 -> LATENCY_CRITICAL
/// 7. otherwise -> OPTIMAL_STABILIZATION
pub fn classify_with_thresholds(
    metrics: &Metrics,
    raw_sampling: u8,
    thresholds: &OutcomeThresholds,
) -> Outcome {
    let security = metrics.security_score;
    let access = metrics.accessibility_score;
    let t = thresholds;

    if raw_sampling == 0 {
        Outcome::AlgorithmFailure
    } else if metrics.battery_years < t.battery_death_years {
        Outcome::SurgicalFailure
    } else if security > t.lockout_security && access < t.lockout_access {
        Outcome::LockoutDeath
    } else if access > t.ransomware_access && security < t.ransomware_security {
        Outcome::Ransomware
    } else if access > t.privacy_leak_access && security < t.privacy_leak_security {
        Outcome::PrivacyLeak
    } else if security > t.latency_security && access < t.latency_access {
        Outcome::LatencyCritical
    } else {
        Outcome::OptimalStabilization
    }
}

/// One rule's evaluation for a given input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleCheck {
    /// Precedence position, 1-based
    pub order: u8,
    pub outcome: Outcome,
    pub condition: String,
    pub matched: bool,
    /// First matching rule; exactly one check is decisive
    pub decisive: bool,
}

/// Evaluate every rule in precedence order
///
/// Unlike `classify_with_thresholds`, later rules are evaluated even after
/// a match so callers can see which predicates overlapped.
pub fn explain(metrics: &Metrics, raw_sampling: u8, thresholds: &OutcomeThresholds) -> Vec<RuleCheck> {
    let security = metrics.security_score;
    let access = metrics.accessibility_score;
    let t = thresholds;

    let rules = [
        (
            Outcome::AlgorithmFailure,
            format!("sampling={} (== 0)", raw_sampling),
            raw_sampling == 0,
        ),
        (
            Outcome::SurgicalFailure,
            format!(
                "battery_years={:.1} (< {:.1})",
                metrics.battery_years, t.battery_death_years
            ),
            metrics.battery_years < t.battery_death_years,
        ),
        (
            Outcome::LockoutDeath,
            format!(
                "security={} (> {}), accessibility={} (< {})",
                security, t.lockout_security, access, t.lockout_access
            ),
            security > t.lockout_security && access < t.lockout_access,
        ),
        (
            Outcome::Ransomware,
            format!(
                "accessibility={} (> {}), security={} (< {})",
                access, t.ransomware_access, security, t.ransomware_security
            ),
            access > t.ransomware_access && security < t.ransomware_security,
        ),
        (
            Outcome::PrivacyLeak,
            format!(
                "accessibility={} (> {}), security={} (< {})",
                access, t.privacy_leak_access, security, t.privacy_leak_security
            ),
            access > t.privacy_leak_access && security < t.privacy_leak_security,
        ),
        (
            Outcome::LatencyCritical,
            format!(
                "security={} (> {}), accessibility={} (< {})",
                security, t.latency_security, access, t.latency_access
            ),
            security > t.latency_security && access < t.latency_access,
        ),
        (
            Outcome::OptimalStabilization,
            "no earlier rule matched".to_string(),
            true,
        ),
    ];

    let mut decided = false;
    rules
        .into_iter()
        .enumerate()
        .map(|(i, (outcome, condition, matched))| {
            let decisive = matched && !decided;
            decided |= matched;
            RuleCheck {
                order: i as u8 + 1,
                outcome,
                condition,
                matched,
                decisive,
            }
        })
        .collect()
}
