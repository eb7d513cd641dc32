//! Device configuration: the three percentage dials
//!
//! Global invariants enforced:
//! - Every constructed Configuration holds dials in [0, 100]
//! - Range handling happens here, never inside the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound of every dial
pub const DIAL_MAX: u8 = 100;

/// One of the three adjustable dials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dial {
    Encryption,
    Access,
    Sampling,
}

impl Dial {
    /// All dials in display order
    pub const ALL: [Dial; 3] = [Dial::Encryption, Dial::Access, Dial::Sampling];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dial::Encryption => "encryption",
            Dial::Access => "access",
            Dial::Sampling => "sampling",
        }
    }
}

impl fmt::Display for Dial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Dial {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encryption" => Ok(Dial::Encryption),
            "access" => Ok(Dial::Access),
            "sampling" => Ok(Dial::Sampling),
            other => Err(ConfigurationError::UnknownDial(other.to_string())),
        }
    }
}

/// How out-of-range dial values are handled at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Silently clamp into [0, 100]
    #[default]
    Clamp,
    /// Refuse values outside [0, 100]
    Reject,
}

impl RangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePolicy::Clamp => "clamp",
            RangePolicy::Reject => "reject",
        }
    }

    /// Apply the policy to a single raw dial value
    pub fn apply(&self, dial: Dial, value: i64) -> Result<u8, ConfigurationError> {
        match self {
            RangePolicy::Clamp => Ok(value.clamp(0, DIAL_MAX as i64) as u8),
            RangePolicy::Reject => {
                if (0..=DIAL_MAX as i64).contains(&value) {
                    Ok(value as u8)
                } else {
                    Err(ConfigurationError::OutOfRange { dial, value })
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{dial} must be within 0..=100 (got {value})")]
    OutOfRange { dial: Dial, value: i64 },

    #[error("unknown dial '{0}' (expected encryption, access or sampling)")]
    UnknownDial(String),
}

/// The three dials, each a percentage in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Configuration {
    encryption: u8,
    access: u8,
    sampling: u8,
}

impl Configuration {
    /// Build a configuration, clamping anything above 100
    pub fn new(encryption: u8, access: u8, sampling: u8) -> Self {
        Configuration {
            encryption: encryption.min(DIAL_MAX),
            access: access.min(DIAL_MAX),
            sampling: sampling.min(DIAL_MAX),
        }
    }

    /// Build a configuration from signed raw input under the given policy
    pub fn from_raw(
        encryption: i64,
        access: i64,
        sampling: i64,
        policy: RangePolicy,
    ) -> Result<Self, ConfigurationError> {
        Ok(Configuration {
            encryption: policy.apply(Dial::Encryption, encryption)?,
            access: policy.apply(Dial::Access, access)?,
            sampling: policy.apply(Dial::Sampling, sampling)?,
        })
    }

    pub fn encryption(&self) -> u8 {
        self.encryption
    }

    pub fn access(&self) -> u8 {
        self.access
    }

    pub fn sampling(&self) -> u8 {
        self.sampling
    }

    pub fn get(&self, dial: Dial) -> u8 {
        match dial {
            Dial::Encryption => self.encryption,
            Dial::Access => self.access,
            Dial::Sampling => self.sampling,
        }
    }

    /// Copy with one dial replaced (clamped to 100)
    pub fn with(mut self, dial: Dial, value: u8) -> Self {
        let value = value.min(DIAL_MAX);
        match dial {
            Dial::Encryption => self.encryption = value,
            Dial::Access => self.access = value,
            Dial::Sampling => self.sampling = value,
        }
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(50, 50, 50)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encryption={} access={} sampling={}",
            self.encryption, self.access, self.sampling
        )
    }
}
