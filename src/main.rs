use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, utils};
use reconciler::Sweep;

#[derive(Parser)]
#[command(name = "agentsweep")]
#[command(about = "Flags stale contact-center accounts against the identity directory")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<AgentSweepCommands>,
}

#[derive(Subcommand)]
enum AgentSweepCommands {
    /// Reconcile both directories and write the deletion report (default)
    Run {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Reference date (defaults to today, UTC)")]
        as_of: Option<NaiveDate>,

        #[arg(long, help = "Log flagged accounts without writing a report")]
        dry_run: bool,
    },
    #[command(flatten)]
    Common(CommonCommands),
}

impl Default for AgentSweepCommands {
    fn default() -> Self {
        Self::Run {
            as_of: None,
            dry_run: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(&cli.common);

    let config = utils::load_config(cli.common.config.as_ref())?;

    let (as_of, dry_run) = match cli.command.unwrap_or_default() {
        AgentSweepCommands::Common(command) => {
            let version = utils::version_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return utils::handle_common_command(&command, &config, &version);
        }
        AgentSweepCommands::Run { as_of, dry_run } => (as_of, dry_run),
    };

    utils::validate_config(&config)?;

    let reference = as_of.unwrap_or_else(|| Utc::now().date_naive());
    log::info!("Starting sweep as of {reference}");
    log::info!("  Directory DSN: {}", config.directory_dsn());
    log::info!("  Report storage DSN: {}", config.storage.dsn);
    if dry_run {
        log::info!("  Dry run: no report will be written");
    }

    let sweep = Sweep::from_config(&config).context("Failed to initialize sweep")?;
    let outcome = sweep
        .run(reference, dry_run)
        .await
        .context("Sweep failed")?;

    match &outcome.report_path {
        Some(path) => log::info!(
            "Flagged {} account(s), report written to {path}",
            outcome.candidates.len()
        ),
        None if outcome.candidates.is_empty() => log::info!("No accounts flagged"),
        None => log::info!(
            "Flagged {} account(s), no report written",
            outcome.candidates.len()
        ),
    }

    Ok(())
}
