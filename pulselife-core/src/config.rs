//! Configuration file support for PulseLife
//!
//! Loads classification thresholds, the range policy and the baseline
//! dial positions from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.pulseliferc.json` in the working directory
//! 3. `pulselife.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::classify::OutcomeThresholds;
use crate::configuration::{Configuration, RangePolicy, DIAL_MAX};
use crate::metrics::BASE_BATTERY_YEARS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: &[&str] = &[".pulseliferc.json", "pulselife.config.json"];

/// PulseLife configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PulselifeConfig {
    /// Custom classification thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Handling of out-of-range dial values (default: clamp)
    #[serde(default)]
    pub range_policy: Option<RangePolicy>,

    /// Starting dial positions (default: 50/50/50)
    #[serde(default)]
    pub baseline: Option<BaselineConfig>,
}

/// Custom classification thresholds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Battery years below which re-operation fails (default: 2.0)
    pub battery_death_years: Option<f64>,
    /// Security above which lockout is possible (default: 80)
    pub lockout_security: Option<u8>,
    /// Accessibility below which lockout is possible (default: 30)
    pub lockout_access: Option<u8>,
    /// Accessibility above which ransomware is possible (default: 70)
    pub ransomware_access: Option<u8>,
    /// Security below which ransomware is possible (default: 40)
    pub ransomware_security: Option<u8>,
    /// Accessibility above which data leaks are possible (default: 60)
    pub privacy_leak_access: Option<u8>,
    /// Security below which data leaks are possible (default: 60)
    pub privacy_leak_security: Option<u8>,
    /// Security above which pacing latency is possible (default: 80)
    pub latency_security: Option<u8>,
    /// Accessibility below which pacing latency is possible (default: 50)
    pub latency_access: Option<u8>,
}

/// Starting dial positions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineConfig {
    pub encryption: Option<u8>,
    pub access: Option<u8>,
    pub sampling: Option<u8>,
}

/// Resolved configuration with defaults filled in
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub thresholds: OutcomeThresholds,
    pub range_policy: RangePolicy,
    pub baseline: Configuration,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl PulselifeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            if let Some(years) = t.battery_death_years {
                let in_range = years > 0.0 && years <= BASE_BATTERY_YEARS;
                if !in_range {
                    anyhow::bail!(
                        "thresholds.battery_death_years must be within (0, {}] (got {})",
                        BASE_BATTERY_YEARS,
                        years
                    );
                }
            }

            for (name, val) in [
                ("lockout_security", t.lockout_security),
                ("lockout_access", t.lockout_access),
                ("ransomware_access", t.ransomware_access),
                ("ransomware_security", t.ransomware_security),
                ("privacy_leak_access", t.privacy_leak_access),
                ("privacy_leak_security", t.privacy_leak_security),
                ("latency_security", t.latency_security),
                ("latency_access", t.latency_access),
            ] {
                if let Some(v) = val {
                    if v > DIAL_MAX {
                        anyhow::bail!("thresholds.{} must be at most {} (got {})", name, DIAL_MAX, v);
                    }
                }
            }
        }

        if let Some(ref b) = self.baseline {
            for (name, val) in [
                ("encryption", b.encryption),
                ("access", b.access),
                ("sampling", b.sampling),
            ] {
                if let Some(v) = val {
                    if v > DIAL_MAX {
                        anyhow::bail!("baseline.{} must be at most {} (got {})", name, DIAL_MAX, v);
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolve config into the form used by the engine
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = OutcomeThresholds::default();
        let thresholds = match &self.thresholds {
            Some(t) => OutcomeThresholds {
                battery_death_years: t.battery_death_years.unwrap_or(defaults.battery_death_years),
                lockout_security: t.lockout_security.unwrap_or(defaults.lockout_security),
                lockout_access: t.lockout_access.unwrap_or(defaults.lockout_access),
                ransomware_access: t.ransomware_access.unwrap_or(defaults.ransomware_access),
                ransomware_security: t.ransomware_security.unwrap_or(defaults.ransomware_security),
                privacy_leak_access: t.privacy_leak_access.unwrap_or(defaults.privacy_leak_access),
                privacy_leak_security: t
                    .privacy_leak_security
                    .unwrap_or(defaults.privacy_leak_security),
                latency_security: t.latency_security.unwrap_or(defaults.latency_security),
                latency_access: t.latency_access.unwrap_or(defaults.latency_access),
            },
            None => defaults,
        };

        let default_baseline = Configuration::default();
        let baseline = match &self.baseline {
            Some(b) => Configuration::new(
                b.encryption.unwrap_or(default_baseline.encryption()),
                b.access.unwrap_or(default_baseline.access()),
                b.sampling.unwrap_or(default_baseline.sampling()),
            ),
            None => default_baseline,
        };

        Ok(ResolvedConfig {
            thresholds,
            range_policy: self.range_policy.unwrap_or_default(),
            baseline,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        PulselifeConfig::default().resolve()
    }
}

/// Discover and load a config file from a directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(PulselifeConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<PulselifeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: PulselifeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (PulselifeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = PulselifeConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.thresholds, OutcomeThresholds::default());
        assert_eq!(resolved.range_policy, RangePolicy::Clamp);
        assert_eq!(resolved.baseline, Configuration::default());
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "thresholds": {
                "battery_death_years": 3.0,
                "lockout_security": 85,
                "lockout_access": 25,
                "ransomware_access": 75,
                "ransomware_security": 35,
                "privacy_leak_access": 65,
                "privacy_leak_security": 55,
                "latency_security": 85,
                "latency_access": 45
            },
            "range_policy": "reject",
            "baseline": { "encryption": 70, "access": 30, "sampling": 40 }
        }"#;
        let config: PulselifeConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.thresholds.battery_death_years, 3.0);
        assert_eq!(resolved.thresholds.lockout_security, 85);
        assert_eq!(resolved.thresholds.latency_access, 45);
        assert_eq!(resolved.range_policy, RangePolicy::Reject);
        assert_eq!(resolved.baseline, Configuration::new(70, 30, 40));
    }

    #[test]
    fn test_partial_thresholds_use_defaults_for_rest() {
        let json = r#"{"thresholds": {"lockout_access": 20}}"#;
        let config: PulselifeConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.thresholds.lockout_access, 20);
        assert_eq!(resolved.thresholds.lockout_security, 80); // default
        assert_eq!(resolved.thresholds.battery_death_years, 2.0); // default
    }

    #[test]
    fn test_partial_baseline_uses_defaults_for_rest() {
        let json = r#"{"baseline": {"sampling": 10}}"#;
        let config: PulselifeConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.baseline, Configuration::new(50, 50, 10));
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<PulselifeConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unknown_range_policy() {
        let json = r#"{"range_policy": "wrap"}"#;
        let result: Result<PulselifeConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_battery_threshold_out_of_range() {
        for json in [
            r#"{"thresholds": {"battery_death_years": 0.0}}"#,
            r#"{"thresholds": {"battery_death_years": -1.0}}"#,
            r#"{"thresholds": {"battery_death_years": 10.5}}"#,
        ] {
            let config: PulselifeConfig = serde_json::from_str(json).unwrap();
            assert!(config.validate().is_err(), "{} should be rejected", json);
        }
    }

    #[test]
    fn test_reject_score_threshold_over_100() {
        let json = r#"{"thresholds": {"ransomware_access": 101}}"#;
        let config: PulselifeConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_baseline_over_100() {
        let json = r#"{"baseline": {"encryption": 120}}"#;
        let config: PulselifeConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".pulseliferc.json");
        fs::write(&config_path, r#"{"range_policy": "reject"}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.range_policy, Some(RangePolicy::Reject));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();

        // Create both config files - .pulseliferc.json should win
        fs::write(
            dir.path().join(".pulseliferc.json"),
            r#"{"baseline": {"access": 10}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("pulselife.config.json"),
            r#"{"baseline": {"access": 90}}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.baseline.and_then(|b| b.access),
            Some(10),
            ".pulseliferc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"thresholds": {"latency_access": 55}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.thresholds.latency_access, 55);
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
