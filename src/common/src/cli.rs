use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Subcommands that inspect the setup without running a sweep
#[derive(Subcommand, Debug, Clone)]
pub enum CommonCommands {
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Log level selected by the verbosity flags.
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging based on CLI arguments
    ///
    /// `RUST_LOG` takes precedence over the flags when set.
    pub fn init_logging(args: &CommonArgs) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("agentsweep configuration:");
            println!("=========================");
            println!("Storage DSN: {}", config.storage.dsn);
            println!("Directory DSN: {}", config.directory_dsn());
            println!("Identity export prefix: {}", config.directory.identity_prefix);
            println!("Contact export prefix: {}", config.directory.contact_prefix);
            println!("Report prefix: {}", config.report.prefix);
            println!("Orphan grace period: {} days", config.rules.orphan_grace_days);
            println!(
                "Training accounts: older than {} days, inactive for {} days, marker '{}'",
                config.rules.training_min_account_age_days,
                config.rules.training_inactivity_days,
                config.rules.training_marker
            );
            println!(
                "Identity inactivity: {} days",
                config.rules.identity_inactivity_days
            );
            if config.exceptions.is_empty() {
                println!("Exceptions: none");
            } else {
                let keys: Vec<_> = config.exceptions.iter().collect();
                println!("Exceptions: {}", keys.join(", "));
            }
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        if config.storage.dsn.is_empty() {
            anyhow::bail!("Storage DSN cannot be empty");
        }

        if config.directory_dsn().is_empty() {
            anyhow::bail!("Directory DSN cannot be empty");
        }

        if config.report.prefix.trim_matches('/').is_empty() {
            anyhow::bail!("Report prefix cannot be empty");
        }

        config
            .rules
            .validate()
            .context("Invalid rule configuration")?;

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle commands that don't run a sweep
    ///
    /// `version` is the calling binary's version line.
    pub fn handle_common_command(
        command: &CommonCommands,
        config: &Configuration,
        version: &str,
    ) -> Result<()> {
        match command {
            CommonCommands::Config { json } => display_config(config, *json),
            CommonCommands::Validate => validate_config(config),
            CommonCommands::Version => {
                println!("{version}");
                Ok(())
            }
        }
    }

    /// Version line for a binary, e.g. `version_info("agentsweep", "0.1.0")`
    pub fn version_info(name: &str, version: &str) -> String {
        format!("{name} {version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, RulesConfig};

    #[test]
    fn test_log_level_from_flags() {
        let mut args = CommonArgs::default();
        assert_eq!(utils::log_level(&args), "info");

        args.verbose = true;
        assert_eq!(utils::log_level(&args), "debug");

        args.quiet = true;
        assert_eq!(utils::log_level(&args), "warn");
    }

    #[test]
    fn test_validate_default_config() {
        assert!(utils::validate_config(&Configuration::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_storage() {
        let mut config = Configuration::default();
        config.storage.dsn.clear();
        assert!(utils::validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_rules() {
        let config = Configuration {
            rules: RulesConfig {
                orphan_grace_days: -1,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = utils::validate_config(&config).unwrap_err();
        assert!(format!("{err:#}").contains("orphan_grace_days"));
    }

    #[test]
    fn test_version_info() {
        let version = utils::version_info("agentsweep", env!("CARGO_PKG_VERSION"));
        assert_eq!(version, format!("agentsweep {}", env!("CARGO_PKG_VERSION")));
    }
}
