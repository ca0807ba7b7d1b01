//! Description cleanup command handlers.

use anyhow::Result;
use tooldex_core::maintenance::{cleanup_descriptions, needs_fixing, quick_fix_descriptions};
use tooldex_core::{Credentials, Tool};

use crate::app::config_runtime::RunSettings;

use super::{completion_client, load_tools, progress_bar, save_tools};

const PREVIEW_TOOLS: usize = 10;
const PREVIEW_CHARS: usize = 60;

pub(crate) async fn run_cleanup_descriptions_command(
    settings: &RunSettings,
    credentials: &Credentials,
) -> Result<()> {
    let completion = completion_client(settings, credentials.require_completion()?)?;
    let limiter = settings.rate_limiter();
    let (store, mut tools) = load_tools(settings);

    let flagged: Vec<&Tool> = tools
        .iter()
        .filter(|tool| needs_fixing(&tool.description))
        .collect();
    if flagged.is_empty() {
        println!("All descriptions look good.");
        return Ok(());
    }
    print_preview(&flagged);

    let progress = progress_bar(settings);
    let report = cleanup_descriptions(&mut tools, &completion, &limiter, &progress).await;
    println!("Rewrote {} descriptions", report.rewritten);
    if report.failed > 0 {
        println!("{} rewrites failed; originals kept", report.failed);
    }
    if report.rewritten > 0 {
        save_tools(&store, &tools)?;
    }
    Ok(())
}

pub(crate) fn run_quick_fix_command(settings: &RunSettings) -> Result<()> {
    let (store, mut tools) = load_tools(settings);
    let changed = quick_fix_descriptions(&mut tools);
    println!("Fixed {changed} descriptions");
    if changed > 0 {
        save_tools(&store, &tools)?;
    }
    Ok(())
}

fn print_preview(flagged: &[&Tool]) {
    println!("{} tools have poor descriptions:", flagged.len());
    for tool in flagged.iter().take(PREVIEW_TOOLS) {
        let preview: String = tool.description.chars().take(PREVIEW_CHARS).collect();
        println!("  - {}: \"{preview}...\"", tool.name);
    }
    if flagged.len() > PREVIEW_TOOLS {
        println!("  ... and {} more", flagged.len() - PREVIEW_TOOLS);
    }
}
