//! PulseLife core library - security vs. accessibility vs. battery tradeoff engine

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Metrics are a pure function of the Configuration, recomputed on every change
// - Classification is total and first-match-wins over a fixed rule order
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Identical input yields byte-for-byte identical output

pub mod classify;
pub mod config;
pub mod configuration;
pub mod metrics;
pub mod outcome;
pub mod report;
pub mod session;
pub mod sweep;
pub mod warnings;

pub use classify::{classify, classify_with_thresholds, OutcomeThresholds};
pub use config::ResolvedConfig;
pub use configuration::{Configuration, ConfigurationError, Dial, RangePolicy};
pub use metrics::{compute_metrics, Metrics};
pub use outcome::{Outcome, OutcomeDetails, Severity};
pub use report::{render_json, render_text, EvaluationReport};
pub use session::{Commit, Session, SessionError};

/// Compute metrics and classify them with default thresholds
///
/// Classification uses the configuration's own sampling value.
pub fn evaluate(config: &Configuration) -> (Metrics, Outcome) {
    let metrics = compute_metrics(config);
    let outcome = classify(&metrics, config.sampling());
    (metrics, outcome)
}
