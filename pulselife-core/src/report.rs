//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::classify::{classify_with_thresholds, explain, RuleCheck};
use crate::config::ResolvedConfig;
use crate::configuration::Configuration;
use crate::metrics::{compute_metrics, Metrics};
use crate::outcome::{Outcome, OutcomeDetails, Severity};
use crate::sweep::SweepSummary;
use crate::warnings::{all_warnings, Advisory};
use serde::Serialize;

/// Complete evaluation of one configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationReport {
    pub configuration: Configuration,
    pub metrics: Metrics,
    pub outcome: Outcome,
    pub severity: Severity,
    pub details: OutcomeDetails,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<RuleCheck>>,
}

impl EvaluationReport {
    /// Evaluate a configuration under resolved settings
    pub fn evaluate(config: &Configuration, settings: &ResolvedConfig, with_explanation: bool) -> Self {
        let metrics = compute_metrics(config);
        let outcome = classify_with_thresholds(&metrics, config.sampling(), &settings.thresholds);
        let explanation = with_explanation
            .then(|| explain(&metrics, config.sampling(), &settings.thresholds));

        EvaluationReport {
            configuration: *config,
            metrics,
            outcome,
            severity: outcome.severity(),
            details: outcome.details(),
            advisories: all_warnings(config, &metrics),
            explanation,
        }
    }
}

/// Render a single evaluation as text
pub fn render_text(report: &EvaluationReport) -> String {
    let mut output = String::new();
    let c = &report.configuration;
    let m = &report.metrics;

    output.push_str(&format!(
        "{:<14} encryption={} access={} sampling={}\n",
        "CONFIG", c.encryption(), c.access(), c.sampling()
    ));
    output.push_str(&format!(
        "{:<14} battery={:.1}y security={} accessibility={}\n",
        "METRICS", m.battery_years, m.security_score, m.accessibility_score
    ));
    output.push_str(&format!(
        "{:<14} {} [{}] ({})\n",
        "OUTCOME",
        report.outcome,
        report.details.code,
        report.severity.as_str()
    ));
    output.push_str(&format!("{:<14} {}\n", "", report.details.title));
    output.push_str(&format!("{:<14} {}\n", "", report.details.description));

    for advisory in &report.advisories {
        output.push_str(&format!("{:<14} {}\n", "WARN", advisory.message));
    }

    if let Some(ref checks) = report.explanation {
        output.push_str("\nRULES\n");
        for check in checks {
            let marker = if check.decisive {
                "=>"
            } else if check.matched {
                " +"
            } else {
                "  "
            };
            output.push_str(&format!(
                "{} {}. {:<22} {}\n",
                marker, check.order, check.outcome, check.condition
            ));
        }
    }

    output
}

/// Render a single evaluation as JSON
pub fn render_json(report: &EvaluationReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Render a sweep summary as text
pub fn render_sweep_text(summary: &SweepSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Sweep step {} ({} configurations)\n\n",
        summary.step, summary.total
    ));
    output.push_str(&format!(
        "{:<22} {:>8} {:>7}  {}\n",
        "OUTCOME", "COUNT", "SHARE", "FIRST CONFIG"
    ));

    for entry in &summary.counts {
        let share = if summary.total == 0 {
            0.0
        } else {
            entry.count as f64 * 100.0 / summary.total as f64
        };
        let example = entry
            .example
            .map(|c| format!("{}/{}/{}", c.encryption(), c.access(), c.sampling()))
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<22} {:>8} {:>6.2}%  {}\n",
            entry.outcome.as_str(),
            entry.count,
            share,
            example
        ));
    }

    output
}

/// Render a sweep summary as JSON
pub fn render_sweep_json(summary: &SweepSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

/// Render the outcome metadata table as text
pub fn render_outcomes_text() -> String {
    let mut output = format!(
        "{:<22} {:<10} {:<12} {:<7} {}\n",
        "OUTCOME", "CODE", "SEVERITY", "COLOR", "TITLE"
    );
    for outcome in Outcome::ALL {
        let details = outcome.details();
        output.push_str(&format!(
            "{:<22} {:<10} {:<12} {:<7} {}\n",
            outcome.as_str(),
            details.code,
            outcome.severity().as_str(),
            details.color,
            details.title
        ));
    }
    output
}

#[derive(Serialize)]
struct OutcomeEntry {
    outcome: Outcome,
    severity: Severity,
    #[serde(flatten)]
    details: OutcomeDetails,
}

/// Render the outcome metadata table as JSON
pub fn render_outcomes_json() -> String {
    let entries: Vec<OutcomeEntry> = Outcome::ALL
        .iter()
        .map(|&outcome| OutcomeEntry {
            outcome,
            severity: outcome.severity(),
            details: outcome.details(),
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> ResolvedConfig {
        ResolvedConfig::defaults().unwrap()
    }

    #[test]
    fn test_evaluate_matches_classifier() {
        let config = Configuration::new(0, 100, 50);
        let report = EvaluationReport::evaluate(&config, &defaults(), false);
        assert_eq!(report.outcome, Outcome::Ransomware);
        assert_eq!(report.severity, Severity::Compromised);
        assert_eq!(report.details.code, "ERR_HACK");
        assert!(report.explanation.is_none());
    }

    #[test]
    fn test_render_text_baseline() {
        let report = EvaluationReport::evaluate(&Configuration::default(), &defaults(), false);
        let expected = "\
CONFIG         encryption=50 access=50 sampling=50
METRICS        battery=6.0y security=50 accessibility=40
OUTCOME        OPTIMAL_STABILIZATION [SYS_OK] (nominal)
               VITAL STABILIZATION
               Firmware updated. Patient stable. Security nominal.
";
        assert_eq!(render_text(&report), expected);
    }

    #[test]
    fn test_render_text_explanation_marks_decisive_rule() {
        let config = Configuration::new(100, 10, 100);
        let report = EvaluationReport::evaluate(&config, &defaults(), true);
        let text = render_text(&report);
        assert!(text.contains("=> 3. LOCKOUT_DEATH"));
        assert!(text.contains(" + 6. LATENCY_CRITICAL"));
    }

    #[test]
    fn test_render_json_fields() {
        let report = EvaluationReport::evaluate(&Configuration::new(100, 0, 0), &defaults(), false);
        let value: serde_json::Value = serde_json::from_str(&render_json(&report)).unwrap();
        assert_eq!(value["outcome"], "ALGORITHM_FAILURE");
        assert_eq!(value["severity"], "fatal");
        assert_eq!(value["configuration"]["sampling"], 0);
        assert_eq!(value["metrics"]["battery_years"], 6.0);
        assert!(value.get("explanation").is_none());
    }

    #[test]
    fn test_render_outcomes_json_lists_all() {
        let value: serde_json::Value = serde_json::from_str(&render_outcomes_json()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0]["outcome"], "SURGICAL_FAILURE");
        assert_eq!(entries[0]["code"], "ERR_BAT");
    }
}
