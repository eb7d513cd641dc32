//! Exhaustive sweep of the configuration space
//!
//! Global invariants enforced:
//! - Grid always includes both 0 and 100 on every dial
//! - Visit order is encryption, then access, then sampling, ascending
//! - Counts are reported for every outcome in Outcome::ALL order

use crate::classify::{classify_with_thresholds, OutcomeThresholds};
use crate::configuration::{Configuration, DIAL_MAX};
use crate::metrics::compute_metrics;
use crate::outcome::Outcome;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    #[error("sweep step must be within 1..=100 (got {0})")]
    InvalidStep(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutcomeCount {
    pub outcome: Outcome,
    pub count: usize,
    /// First configuration visited that produced this outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Configuration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SweepSummary {
    pub step: u8,
    pub total: usize,
    pub counts: Vec<OutcomeCount>,
}

impl SweepSummary {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.counts
            .iter()
            .find(|c| c.outcome == outcome)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Dial positions visited for a given step
pub fn grid_values(step: u8) -> Vec<u8> {
    let step = step.max(1);
    let mut values: Vec<u8> = (0..=DIAL_MAX).step_by(step as usize).collect();
    if values.last() != Some(&DIAL_MAX) {
        values.push(DIAL_MAX);
    }
    values
}

/// Classify every configuration on the grid
pub fn sweep(step: u32, thresholds: &OutcomeThresholds) -> Result<SweepSummary, SweepError> {
    if step == 0 || step > DIAL_MAX as u32 {
        return Err(SweepError::InvalidStep(step));
    }
    let step = step as u8;
    let values = grid_values(step);

    let mut counts: Vec<OutcomeCount> = Outcome::ALL
        .iter()
        .map(|&outcome| OutcomeCount {
            outcome,
            count: 0,
            example: None,
        })
        .collect();
    let mut total = 0;

    for &encryption in &values {
        for &access in &values {
            for &sampling in &values {
                let config = Configuration::new(encryption, access, sampling);
                let metrics = compute_metrics(&config);
                let outcome = classify_with_thresholds(&metrics, sampling, thresholds);

                // ALL is exhaustive, so the slot always exists
                if let Some(slot) = counts.iter_mut().find(|c| c.outcome == outcome) {
                    slot.count += 1;
                    slot.example.get_or_insert(config);
                }
                total += 1;
            }
        }
    }

    tracing::debug!(step, total, "sweep complete");

    Ok(SweepSummary {
        step,
        total,
        counts,
    })
}
