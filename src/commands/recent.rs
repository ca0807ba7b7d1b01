//! Recent command handler.

use anyhow::Result;
use chrono::Utc;
use tooldex_core::maintenance::recently_added;

use crate::app::config_runtime::RunSettings;

use super::{load_tools, tool_line};

pub(crate) fn run_recent_command(settings: &RunSettings, hours: u32) -> Result<()> {
    let (_, tools) = load_tools(settings);
    let now = Utc::now();
    let recent = recently_added(&tools, now, hours);

    if recent.is_empty() {
        println!("No tools added in the last {hours} hours.");
        return Ok(());
    }
    println!("{} tools added in the last {hours} hours:", recent.len());
    for tool in recent {
        let age_hours = tool
            .date_added
            .map_or(0, |added| (now - added).num_hours());
        println!("  {} [{age_hours}h ago]", tool_line(tool));
    }
    Ok(())
}
