//! Discover command handler.

use anyhow::Result;
use tooldex_core::discovery::DiscoveryReport;
use tooldex_core::{Credentials, DiscoveryOptions, DiscoveryPipeline, LogoResolver, sort_tools};
use tracing::info;

use crate::app::config_runtime::RunSettings;

use super::{
    completion_client, load_tools, logo_probe, progress_bar, save_tools, search_client, tool_line,
};

pub(crate) async fn run_discover_command(
    settings: &RunSettings,
    credentials: &Credentials,
    max_per_query: usize,
) -> Result<()> {
    let search = search_client(settings, credentials.require_search()?)?;
    let completion = completion_client(settings, credentials.require_completion()?)?;
    let probe = logo_probe()?;
    let limiter = settings.rate_limiter();

    let (store, mut tools) = load_tools(settings);
    info!(max_per_query, "Starting discovery");

    let options = DiscoveryOptions {
        max_per_query,
        ..DiscoveryOptions::default()
    };
    let pipeline = DiscoveryPipeline::new(&search, &completion, &probe, &limiter)
        .with_options(options)
        .with_logo_resolver(LogoResolver::new(settings.logo_service_url.clone()));
    let progress = progress_bar(settings);
    let report = pipeline.run(&tools, &progress).await;

    print_summary(&report);
    if report.accepted.is_empty() {
        println!("No new tools discovered.");
        return Ok(());
    }

    tools.extend(report.accepted);
    sort_tools(&mut tools);
    save_tools(&store, &tools)
}

fn print_summary(report: &DiscoveryReport) {
    println!("Discovery summary:");
    println!("  Search queries run: {}", report.queries_run);
    println!("  Failed searches: {}", report.search_failures);
    println!("  Search results: {}", report.search_results);
    println!("  Candidates found: {}", report.candidates);
    println!("  Rejected as articles/lists: {}", report.bad_content);
    println!("  Duplicates filtered: {}", report.duplicates);
    println!("  Rejected by classifier: {}", report.classifier_rejections);
    println!("  New tools discovered: {}", report.accepted.len());
    for (index, tool) in report.accepted.iter().enumerate() {
        println!("  {}. {}", index + 1, tool_line(tool));
    }
}
