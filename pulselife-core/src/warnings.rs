//! Advisory warnings for dials and metrics
//!
//! Advisories never affect classification; they only describe which side of
//! a tradeoff a dial or score is drifting toward.

use crate::configuration::{Configuration, Dial};
use crate::metrics::Metrics;
use serde::Serialize;

const ENCRYPTION_VULNERABLE_BELOW: u8 = 30;
const ENCRYPTION_LATENCY_ABOVE: u8 = 80;
const ACCESS_EXPOSED_ABOVE: u8 = 70;
const ACCESS_LOCKOUT_BELOW: u8 = 20;
const SAMPLING_DRAIN_ABOVE: u8 = 90;
const SAMPLING_GAP_BELOW: u8 = 10;

const BATTERY_CRITICAL_BELOW: f64 = 2.0;
const SECURITY_LOW_BELOW: u8 = 40;
const ACCESSIBILITY_EXPOSED_ABOVE: u8 = 70;

/// What an advisory refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySubject {
    Encryption,
    Access,
    Sampling,
    Battery,
    Security,
    Accessibility,
}

impl From<Dial> for AdvisorySubject {
    fn from(dial: Dial) -> Self {
        match dial {
            Dial::Encryption => AdvisorySubject::Encryption,
            Dial::Access => AdvisorySubject::Access,
            Dial::Sampling => AdvisorySubject::Sampling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub subject: AdvisorySubject,
    pub message: &'static str,
}

/// Warning for a single dial value, if any
pub fn dial_warning(dial: Dial, value: u8) -> Option<&'static str> {
    match dial {
        Dial::Encryption if value < ENCRYPTION_VULNERABLE_BELOW => {
            Some("CRITICAL: FIRMWARE VULNERABLE TO INJECTION")
        }
        Dial::Encryption if value > ENCRYPTION_LATENCY_ABOVE => {
            Some("HIGH LATENCY: BATTERY DRAIN INCREASED")
        }
        Dial::Access if value > ACCESS_EXPOSED_ABOVE => Some("UNSECURED: RANSOMWARE VECTOR OPEN"),
        Dial::Access if value < ACCESS_LOCKOUT_BELOW => {
            Some("LOCKOUT RISK: EMERGENCY CREWS BLOCKED")
        }
        Dial::Sampling if value > SAMPLING_DRAIN_ABOVE => {
            Some("EXTREME DRAIN: RAPID BATTERY DEPLETION")
        }
        Dial::Sampling if value < SAMPLING_GAP_BELOW => Some("DATA GAP: ARRHYTHMIA MISSED"),
        _ => None,
    }
}

/// Warnings for every dial, in dial order
pub fn dial_warnings(config: &Configuration) -> Vec<Advisory> {
    Dial::ALL
        .iter()
        .filter_map(|&dial| {
            dial_warning(dial, config.get(dial)).map(|message| Advisory {
                subject: dial.into(),
                message,
            })
        })
        .collect()
}

/// Warnings for derived metrics
pub fn metric_warnings(metrics: &Metrics) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if metrics.battery_years < BATTERY_CRITICAL_BELOW {
        advisories.push(Advisory {
            subject: AdvisorySubject::Battery,
            message: "BATTERY CRITICAL: REPLACEMENT SURGERY REQUIRED",
        });
    }
    if metrics.security_score < SECURITY_LOW_BELOW {
        advisories.push(Advisory {
            subject: AdvisorySubject::Security,
            message: "SECURITY LOW: DEVICE EXPOSED",
        });
    }
    if metrics.accessibility_score > ACCESSIBILITY_EXPOSED_ABOVE {
        advisories.push(Advisory {
            subject: AdvisorySubject::Accessibility,
            message: "ACCESS HIGH: ATTACK SURFACE WIDENED",
        });
    }

    advisories
}

/// Dial warnings followed by metric warnings
pub fn all_warnings(config: &Configuration, metrics: &Metrics) -> Vec<Advisory> {
    let mut advisories = dial_warnings(config);
    advisories.extend(metric_warnings(metrics));
    advisories
}
