//! Outcome verdicts and their static display metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal verdict of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    SurgicalFailure,
    LockoutDeath,
    Ransomware,
    OptimalStabilization,
    PrivacyLeak,
    LatencyCritical,
    AlgorithmFailure,
}

/// Grouping used for cues after a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Patient does not survive
    Fatal,
    /// Patient survives, device or data compromised
    Compromised,
    Nominal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Compromised => "compromised",
            Severity::Nominal => "nominal",
        }
    }
}

/// Presentation metadata for an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeDetails {
    pub title: &'static str,
    pub description: &'static str,
    pub code: &'static str,
    pub color: &'static str,
}

impl Outcome {
    /// All outcomes in declaration order
    pub const ALL: [Outcome; 7] = [
        Outcome::SurgicalFailure,
        Outcome::LockoutDeath,
        Outcome::Ransomware,
        Outcome::OptimalStabilization,
        Outcome::PrivacyLeak,
        Outcome::LatencyCritical,
        Outcome::AlgorithmFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::SurgicalFailure => "SURGICAL_FAILURE",
            Outcome::LockoutDeath => "LOCKOUT_DEATH",
            Outcome::Ransomware => "RANSOMWARE",
            Outcome::OptimalStabilization => "OPTIMAL_STABILIZATION",
            Outcome::PrivacyLeak => "PRIVACY_LEAK",
            Outcome::LatencyCritical => "LATENCY_CRITICAL",
            Outcome::AlgorithmFailure => "ALGORITHM_FAILURE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Outcome::SurgicalFailure
            | Outcome::LockoutDeath
            | Outcome::LatencyCritical
            | Outcome::AlgorithmFailure => Severity::Fatal,
            Outcome::Ransomware | Outcome::PrivacyLeak => Severity::Compromised,
            Outcome::OptimalStabilization => Severity::Nominal,
        }
    }

    pub fn details(&self) -> OutcomeDetails {
        match self {
            Outcome::SurgicalFailure => OutcomeDetails {
                title: "SURGICAL FAILURE",
                description: "Battery depleted. Patient died on the table during re-operation.",
                code: "ERR_BAT",
                color: "red",
            },
            Outcome::LockoutDeath => OutcomeDetails {
                title: "EMERGENCY LOCKOUT",
                description: "First Responders locked out. Patient stabilization failed.",
                code: "ERR_AUTH",
                color: "red",
            },
            Outcome::Ransomware => OutcomeDetails {
                title: "SYSTEM COMPROMISED",
                description: "Device hacked. Ransomware deployed. Bitcoins demanded.",
                code: "ERR_HACK",
                color: "yellow",
            },
            Outcome::OptimalStabilization => OutcomeDetails {
                title: "VITAL STABILIZATION",
                description: "Firmware updated. Patient stable. Security nominal.",
                code: "SYS_OK",
                color: "green",
            },
            Outcome::PrivacyLeak => OutcomeDetails {
                title: "DATA HARVESTED",
                description: "Patient lived, but biometrics were scraped by 3rd parties.",
                code: "WARN_LEAK",
                color: "orange",
            },
            Outcome::LatencyCritical => OutcomeDetails {
                title: "PACING LATENCY",
                description: "Encryption overhead caused missed beats. Chronic arrhythmia.",
                code: "ERR_LAG",
                color: "red",
            },
            Outcome::AlgorithmFailure => OutcomeDetails {
                title: "ALGORITHM FAILURE",
                description: "Zero data sampling. Pacemaker blind to arrhythmia. Patient died.",
                code: "ERR_NOSIG",
                color: "red",
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Outcome::ALL
            .into_iter()
            .find(|o| o.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("unknown outcome: {}", s))
    }
}
