//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

use tooldex_core::discovery::DEFAULT_MAX_PER_QUERY;
use tooldex_core::maintenance::{DEFAULT_BACKFILL_DAYS, DEFAULT_RECENT_HOURS};

/// Discover, classify and maintain an AI tool directory.
///
/// Tooldex keeps a flat JSON file of AI tools current: it searches the web
/// for new tools, filters and classifies them with an LLM, and runs
/// maintenance passes over the existing entries.
#[derive(Parser, Debug)]
#[command(name = "tooldex")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output and progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path of the tools JSON file (default: ai-tools.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub tools_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search the web for new AI tools and add the ones that pass every filter
    Discover {
        /// Maximum new tools accepted per search query (at least 1)
        #[arg(
            value_name = "MAX_PER_QUERY",
            default_value_t = DEFAULT_MAX_PER_QUERY,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        max_per_query: usize,
    },
    /// Score tools whose popularity is missing or still the unknown default
    BackfillPopularity {
        /// Process at most this many tools
        #[arg(long, value_name = "N")]
        max_tools: Option<usize>,
    },
    /// Give undated tools an added date in the past
    BackfillDates {
        /// How many days before now the stamped date lies
        #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_BACKFILL_DAYS)]
        days_ago: u32,
    },
    /// Rewrite poor descriptions through the completion service
    CleanupDescriptions,
    /// Clean up descriptions with text rules only (no API key needed)
    QuickFixDescriptions,
    /// List tools added recently
    Recent {
        /// Look-back window in hours
        #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_RECENT_HOURS)]
        hours: u32,
    },
}
