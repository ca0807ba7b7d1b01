//! Backfill-dates command handler.

use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, SubsecRound, Utc};
use tooldex_core::maintenance::{backfill_dates, days_before};

use crate::app::config_runtime::RunSettings;

use super::{load_tools, save_tools};

pub(crate) fn run_backfill_dates_command(settings: &RunSettings, days_ago: u32) -> Result<()> {
    let stamp = days_before(Utc::now().trunc_subsecs(3), days_ago)
        .ok_or_else(|| anyhow!("--days-ago {days_ago} reaches outside the supported date range"))?;
    let (store, mut tools) = load_tools(settings);

    let report = backfill_dates(&mut tools, stamp);
    println!("Updated: {} tools", report.updated);
    println!("Skipped: {} tools (already dated)", report.skipped);

    if report.updated == 0 {
        println!("No changes needed.");
        return Ok(());
    }
    save_tools(&store, &tools)?;
    println!(
        "Undated tools now have dateAdded {}",
        report.stamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    Ok(())
}
