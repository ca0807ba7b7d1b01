//! CLI command handlers.
//!
//! Each handler loads the tools file, runs one library operation, prints a
//! summary on stdout and saves the file when something changed.

mod dates;
mod descriptions;
mod discover;
mod popularity;
mod recent;

pub(crate) use dates::run_backfill_dates_command;
pub(crate) use descriptions::{run_cleanup_descriptions_command, run_quick_fix_command};
pub(crate) use discover::run_discover_command;
pub(crate) use popularity::run_backfill_popularity_command;
pub(crate) use recent::run_recent_command;

use anyhow::{Context, Result};
use tooldex_core::{BraveSearchClient, ChatCompletionClient, HttpLogoProbe, Tool, ToolStore};

use crate::app::config_runtime::RunSettings;
use crate::app::progress_manager::BarProgress;
use crate::app::terminal;

/// Opens the tools file; a missing or unreadable file yields an empty set.
fn load_tools(settings: &RunSettings) -> (ToolStore, Vec<Tool>) {
    let mut store = ToolStore::new(&settings.tools_file);
    let tools = store.load();
    println!(
        "Loaded {} tools from {}",
        tools.len(),
        settings.tools_file.display()
    );
    (store, tools)
}

fn save_tools(store: &ToolStore, tools: &[Tool]) -> Result<()> {
    store
        .save(tools)
        .with_context(|| format!("failed to save {}", store.path().display()))?;
    println!("Saved {} tools to {}", tools.len(), store.path().display());
    Ok(())
}

fn search_client(settings: &RunSettings, api_key: &str) -> Result<BraveSearchClient> {
    let client = match settings.search_base_url.as_deref() {
        Some(base_url) => BraveSearchClient::with_base_url(api_key, base_url),
        None => BraveSearchClient::new(api_key),
    };
    client.context("failed to build search client")
}

fn completion_client(settings: &RunSettings, api_key: &str) -> Result<ChatCompletionClient> {
    let model = settings.completion_model.as_str();
    let client = match settings.completion_base_url.as_deref() {
        Some(base_url) => ChatCompletionClient::with_base_url(api_key, model, base_url),
        None => ChatCompletionClient::new(api_key, model),
    };
    client.context("failed to build completion client")
}

fn logo_probe() -> Result<HttpLogoProbe> {
    HttpLogoProbe::new().context("failed to build logo probe client")
}

fn progress_bar(settings: &RunSettings) -> BarProgress {
    BarProgress::new(terminal::progress_bars_enabled(settings.show_progress))
}

/// `"Name (category) - pricing"` line used in listings.
fn tool_line(tool: &Tool) -> String {
    format!("{} ({}) - {}", tool.name, tool.category, tool.pricing)
}

#[cfg(test)]
mod tests {
    use super::tool_line;
    use tooldex_core::{Category, Pricing, Tool};

    #[test]
    fn test_tool_line_shows_category_and_pricing() {
        let tool = Tool::new("Claude", Category::Chat, "d", Pricing::Freemium, "https://claude.ai");
        assert_eq!(tool_line(&tool), "Claude (chat) - freemium");
    }
}
