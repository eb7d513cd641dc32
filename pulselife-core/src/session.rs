//! Caller-side simulation session
//!
//! Owns a configuration over time, keeps live metrics in step with it, and
//! freezes a single outcome on commit.
//!
//! Global invariants enforced:
//! - Live metrics always equal compute_metrics(current configuration)
//! - At most one commit per session until reset
//! - The event log never exceeds LOG_CAPACITY lines

use crate::classify::{classify_with_thresholds, OutcomeThresholds};
use crate::config::ResolvedConfig;
use crate::configuration::{Configuration, ConfigurationError, Dial, RangePolicy};
use crate::metrics::{compute_metrics, Metrics};
use crate::outcome::Outcome;
use crate::warnings::dial_warning;
use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum number of retained log lines
pub const LOG_CAPACITY: usize = 20;

const THERMAL_THROTTLE_ABOVE: u8 = 90;
const OPEN_PORT_ABOVE: u8 = 90;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session already committed to {0}; reset before changing it")]
    Committed(Outcome),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Result frozen at commit time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Commit {
    pub configuration: Configuration,
    pub metrics: Metrics,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct Session {
    baseline: Configuration,
    configuration: Configuration,
    metrics: Metrics,
    thresholds: OutcomeThresholds,
    range_policy: RangePolicy,
    commit: Option<Commit>,
    log: VecDeque<String>,
}

impl Session {
    /// Start a session at `baseline` with default thresholds and clamping
    pub fn new(baseline: Configuration) -> Self {
        Self::with_settings(baseline, OutcomeThresholds::default(), RangePolicy::default())
    }

    pub fn with_settings(
        baseline: Configuration,
        thresholds: OutcomeThresholds,
        range_policy: RangePolicy,
    ) -> Self {
        let mut session = Session {
            baseline,
            configuration: baseline,
            metrics: compute_metrics(&baseline),
            thresholds,
            range_policy,
            commit: None,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        };
        session.push_log("> SYSTEM INITIALIZED... OK".to_string());
        session.push_log("> PACEMAKER CONNECTED... OK".to_string());
        session.push_log("> AWAITING CONFIG...".to_string());
        session
    }

    /// Start a session from a resolved config file
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::with_settings(config.baseline, config.thresholds, config.range_policy)
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn committed(&self) -> Option<&Commit> {
        self.commit.as_ref()
    }

    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// Change one dial and recompute metrics
    pub fn set_dial(&mut self, dial: Dial, raw_value: i64) -> Result<Metrics, SessionError> {
        if let Some(commit) = &self.commit {
            return Err(SessionError::Committed(commit.outcome));
        }

        let value = self.range_policy.apply(dial, raw_value)?;
        let previous_warning = dial_warning(dial, self.configuration.get(dial));
        self.configuration = self.configuration.with(dial, value);
        self.metrics = compute_metrics(&self.configuration);

        tracing::debug!(
            dial = dial.as_str(),
            value,
            battery_years = self.metrics.battery_years,
            security = self.metrics.security_score,
            accessibility = self.metrics.accessibility_score,
            "metrics recomputed"
        );

        self.push_log(format!("> {} SET TO {}", dial.as_str().to_uppercase(), value));
        if dial == Dial::Encryption && value > THERMAL_THROTTLE_ABOVE {
            self.push_log("WARN: THERMAL THROTTLING DETECTED".to_string());
        }
        if dial == Dial::Access && value > OPEN_PORT_ABOVE {
            self.push_log("WARN: PORT 80 OPEN - LISTENING".to_string());
        }
        // Only log an advisory when the dial crosses into a new warning zone
        if let Some(message) = dial_warning(dial, value) {
            if previous_warning != Some(message) {
                self.push_log(format!("WARN: {}", message));
            }
        }

        Ok(self.metrics)
    }

    /// Classify the live metrics and freeze the result
    pub fn commit(&mut self) -> Result<Commit, SessionError> {
        if let Some(commit) = &self.commit {
            return Err(SessionError::Committed(commit.outcome));
        }

        let outcome = classify_with_thresholds(
            &self.metrics,
            self.configuration.sampling(),
            &self.thresholds,
        );
        let commit = Commit {
            configuration: self.configuration,
            metrics: self.metrics,
            outcome,
        };

        tracing::info!(
            outcome = outcome.as_str(),
            configuration = %self.configuration,
            "firmware committed"
        );

        let details = outcome.details();
        self.push_log(format!("> FIRMWARE COMMITTED: {} [{}]", details.title, details.code));
        self.commit = Some(commit);
        Ok(commit)
    }

    /// Clear the commit and return to the baseline configuration
    pub fn reset(&mut self) {
        self.configuration = self.baseline;
        self.metrics = compute_metrics(&self.baseline);
        self.commit = None;
        self.log.clear();
        self.push_log("> SYSTEM REBOOTED...".to_string());
        self.push_log("> READY".to_string());
        tracing::debug!("session reset");
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Configuration::default())
    }
}
