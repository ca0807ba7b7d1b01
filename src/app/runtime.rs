//! Startup sequence and command dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tooldex_core::config::load_default_file_config;
use tooldex_core::{Credentials, configure_http_timeouts};
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::{config_runtime, terminal};
use crate::cli::{Cli, Command};
use crate::commands;

pub(crate) async fn run_tooldex() -> Result<ProcessExit> {
    let cli = Cli::parse();

    let loaded = load_default_file_config().context("failed to load config file")?;
    let settings = config_runtime::resolve_settings(&cli.global, &loaded.file_config());
    terminal::init_tracing(settings.log_level);

    debug!(?cli, "CLI arguments parsed");
    if let Some(path) = loaded.path.as_deref().filter(|_| loaded.loaded_from_file()) {
        debug!(path = %path.display(), "Config file loaded");
    }
    info!(tools_file = %settings.tools_file.display(), "Tooldex starting");

    configure_http_timeouts(settings.connect_timeout_secs, settings.read_timeout_secs);
    let credentials = Credentials::from_env();
    debug!(?credentials, "Credentials read from environment");

    match &cli.command {
        Command::Discover { max_per_query } => {
            commands::run_discover_command(&settings, &credentials, *max_per_query).await?;
        }
        Command::BackfillPopularity { max_tools } => {
            commands::run_backfill_popularity_command(&settings, &credentials, *max_tools).await?;
        }
        Command::BackfillDates { days_ago } => {
            commands::run_backfill_dates_command(&settings, *days_ago)?;
        }
        Command::CleanupDescriptions => {
            commands::run_cleanup_descriptions_command(&settings, &credentials).await?;
        }
        Command::QuickFixDescriptions => {
            commands::run_quick_fix_command(&settings)?;
        }
        Command::Recent { hours } => {
            commands::run_recent_command(&settings, *hours)?;
        }
    }

    Ok(ProcessExit::Success)
}
