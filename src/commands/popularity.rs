//! Backfill-popularity command handler.

use anyhow::Result;
use tooldex_core::Credentials;
use tooldex_core::maintenance::{backfill_popularity, top_by_popularity};

use crate::app::config_runtime::RunSettings;

use super::{load_tools, progress_bar, save_tools, search_client};

const TOP_LISTING: usize = 10;

pub(crate) async fn run_backfill_popularity_command(
    settings: &RunSettings,
    credentials: &Credentials,
    max_tools: Option<usize>,
) -> Result<()> {
    let search = search_client(settings, credentials.require_search()?)?;
    let limiter = settings.rate_limiter();
    let (store, mut tools) = load_tools(settings);

    let progress = progress_bar(settings);
    let report = backfill_popularity(&mut tools, &search, &limiter, max_tools, &progress).await;

    if report.needing_scores == 0 {
        println!("All tools already have popularity scores.");
        return Ok(());
    }
    println!("{} tools needed popularity scores", report.needing_scores);
    println!("Updated {} tools", report.updated);
    if report.failed > 0 {
        println!("{} searches failed and were scored as unknown", report.failed);
    }
    if report.updated > 0 {
        save_tools(&store, &tools)?;
    }

    println!("Top {TOP_LISTING} most popular tools:");
    for (index, tool) in top_by_popularity(&tools, TOP_LISTING).iter().enumerate() {
        println!(
            "  {}. {} - popularity {}",
            index + 1,
            tool.name,
            tool.popularity.unwrap_or_default()
        );
    }
    Ok(())
}
