//! PulseLife CLI - pacemaker security/accessibility/battery tradeoff simulator

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Diagnostics go to stderr, results to stdout

use anyhow::Context;
use clap::{Parser, Subcommand};
use pulselife_core::config::{self, ResolvedConfig};
use pulselife_core::report::{
    render_outcomes_json, render_outcomes_text, render_sweep_json, render_sweep_text,
};
use pulselife_core::sweep;
use pulselife_core::{render_json, render_text, Configuration, Dial, EvaluationReport};
use pulselife_core::{RangePolicy, Session};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulselife")]
#[command(about = "Pacemaker firmware tradeoff simulator: security vs. accessibility vs. battery life")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics and the outcome for one configuration
    Evaluate {
        /// Encryption level 0-100 (default: config baseline)
        #[arg(long, allow_hyphen_values = true)]
        encryption: Option<i64>,

        /// Remote access level 0-100 (default: config baseline)
        #[arg(long, allow_hyphen_values = true)]
        access: Option<i64>,

        /// Data sampling rate 0-100 (default: config baseline)
        #[arg(long, allow_hyphen_values = true)]
        sampling: Option<i64>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Show every classification rule and whether it matched
        #[arg(long)]
        explain: bool,

        /// Out-of-range handling (overrides config file)
        #[arg(long)]
        range_policy: Option<RangePolicyArg>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Classify every configuration on a grid and count outcomes
    Sweep {
        /// Grid step for every dial (1-100)
        #[arg(long, default_value = "5")]
        step: u32,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List every outcome with its display metadata
    Outcomes {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Replay dial changes through a session, then commit
    Session {
        /// Dial change as dial=value, applied in order (repeatable)
        #[arg(long = "set", value_name = "DIAL=VALUE", allow_hyphen_values = true)]
        changes: Vec<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Out-of-range handling (overrides config file)
        #[arg(long)]
        range_policy: Option<RangePolicyArg>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RangePolicyArg {
    Clamp,
    Reject,
}

impl From<RangePolicyArg> for RangePolicy {
    fn from(arg: RangePolicyArg) -> Self {
        match arg {
            RangePolicyArg::Clamp => RangePolicy::Clamp,
            RangePolicyArg::Reject => RangePolicy::Reject,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Evaluate {
            encryption,
            access,
            sampling,
            format,
            explain,
            range_policy,
            config: config_path,
        } => {
            let mut settings = load_settings(config_path.as_deref())?;
            if let Some(policy) = range_policy {
                settings.range_policy = policy.into();
            }

            // CLI values override the config baseline
            let baseline = settings.baseline;
            let configuration = Configuration::from_raw(
                encryption.unwrap_or(baseline.encryption() as i64),
                access.unwrap_or(baseline.access() as i64),
                sampling.unwrap_or(baseline.sampling() as i64),
                settings.range_policy,
            )
            .context("invalid configuration")?;

            let report = EvaluationReport::evaluate(&configuration, &settings, explain);
            match format {
                OutputFormat::Text => print!("{}", render_text(&report)),
                OutputFormat::Json => println!("{}", render_json(&report)),
            }
        }
        Commands::Sweep {
            step,
            format,
            config: config_path,
        } => {
            let settings = load_settings(config_path.as_deref())?;
            let summary = sweep::sweep(step, &settings.thresholds)?;
            match format {
                OutputFormat::Text => print!("{}", render_sweep_text(&summary)),
                OutputFormat::Json => println!("{}", render_sweep_json(&summary)),
            }
        }
        Commands::Outcomes { format } => match format {
            OutputFormat::Text => print!("{}", render_outcomes_text()),
            OutputFormat::Json => println!("{}", render_outcomes_json()),
        },
        Commands::Session {
            changes,
            format,
            range_policy,
            config: config_path,
        } => {
            let mut settings = load_settings(config_path.as_deref())?;
            if let Some(policy) = range_policy {
                settings.range_policy = policy.into();
            }
            handle_session(&changes, format, &settings)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let cwd = std::env::current_dir()?;
                let (config_path, resolved) = match path {
                    Some(p) => {
                        let resolved = config::load_and_resolve(&cwd, Some(p.as_path()));
                        (p, resolved)
                    }
                    None => match config::discover_config(&cwd) {
                        Ok(Some((_, found))) => {
                            let resolved = config::load_and_resolve(&cwd, Some(found.as_path()));
                            (found, resolved)
                        }
                        Ok(None) => {
                            println!("No config file found. Using defaults.");
                            return Ok(());
                        }
                        Err(e) => return Err(e),
                    },
                };

                match resolved {
                    Ok(_) => {
                        println!("Config valid: {}", config_path.display());
                    }
                    Err(e) => anyhow::bail!("Config validation failed: {:#}", e),
                }
            }
            ConfigAction::Show { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref())
                    .context("failed to load configuration")?;
                print_resolved(&resolved);
            }
        },
    }

    Ok(())
}

/// Install the stderr tracing subscriber
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration from an explicit path or the working directory
fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let cwd = std::env::current_dir()?;
    let settings =
        config::load_and_resolve(&cwd, config_path).context("failed to load configuration")?;
    if let Some(path) = &settings.config_path {
        tracing::info!("using config: {}", path.display());
    }
    Ok(settings)
}

/// Parse a `dial=value` pair
fn parse_change(change: &str) -> anyhow::Result<(Dial, i64)> {
    let (dial, value) = change
        .split_once('=')
        .with_context(|| format!("expected DIAL=VALUE, got '{}'", change))?;
    let dial: Dial = dial.parse()?;
    let value: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}: '{}'", dial, value))?;
    Ok((dial, value))
}

fn handle_session(
    changes: &[String],
    format: OutputFormat,
    settings: &ResolvedConfig,
) -> anyhow::Result<()> {
    let mut session = Session::from_config(settings);

    for change in changes {
        let (dial, value) = parse_change(change)?;
        session
            .set_dial(dial, value)
            .with_context(|| format!("failed to apply {}", change))?;
    }

    let commit = session.commit()?;
    let report = EvaluationReport::evaluate(&commit.configuration, settings, false);
    let log: Vec<&str> = session.log().collect();

    match format {
        OutputFormat::Text => {
            for line in &log {
                println!("{}", line);
            }
            println!();
            print!("{}", render_text(&report));
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "log": log,
                "commit": commit,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

fn print_resolved(resolved: &ResolvedConfig) {
    match &resolved.config_path {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!();

    let t = &resolved.thresholds;
    println!("Thresholds:");
    println!("  battery_death_years:   {:.1}", t.battery_death_years);
    println!("  lockout_security:      {}", t.lockout_security);
    println!("  lockout_access:        {}", t.lockout_access);
    println!("  ransomware_access:     {}", t.ransomware_access);
    println!("  ransomware_security:   {}", t.ransomware_security);
    println!("  privacy_leak_access:   {}", t.privacy_leak_access);
    println!("  privacy_leak_security: {}", t.privacy_leak_security);
    println!("  latency_security:      {}", t.latency_security);
    println!("  latency_access:        {}", t.latency_access);
    println!();
    println!("Range policy: {}", resolved.range_policy.as_str());
    println!("Baseline:     {}", resolved.baseline);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_change() {
        assert_eq!(parse_change("encryption=80").unwrap(), (Dial::Encryption, 80));
        assert_eq!(parse_change("Access = -5").unwrap(), (Dial::Access, -5));
        assert!(parse_change("sampling").is_err());
        assert!(parse_change("volume=3").is_err());
        assert!(parse_change("sampling=lots").is_err());
    }
}
