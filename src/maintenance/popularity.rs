//! Search-volume popularity lookup and backfill.

use tracing::{info, instrument, warn};

use crate::api::SearchApi;
use crate::progress::Progress;
use crate::rate_limiter::{RateLimiter, SEARCH_SERVICE};
use crate::tool::{Tool, calculate_popularity};

/// Results requested per popularity query; only the total count is used.
pub const POPULARITY_RESULT_COUNT: u8 = 5;

/// Outcome of one popularity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularityLookup {
    /// Reported total result count (0 on failure or when absent).
    pub search_count: u64,
    pub score: u8,
    /// Whether the search call failed.
    pub failed: bool,
}

/// Summary of a popularity backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityReport {
    /// Tools that still carried the unknown score before the run.
    pub needing_scores: usize,
    /// Tools that received a score.
    pub updated: usize,
    /// Lookups whose search call failed (scored as zero results).
    pub failed: usize,
}

/// Queries `"<name> AI tool"` and maps the total count onto the popularity scale.
///
/// Search failures are logged and scored as zero results.
#[instrument(skip(search, limiter))]
pub async fn search_popularity(
    search: &dyn SearchApi,
    limiter: &RateLimiter,
    name: &str,
) -> PopularityLookup {
    limiter.acquire(SEARCH_SERVICE).await;
    let query = format!("{name} AI tool");
    let (search_count, failed) = match search.search(&query, POPULARITY_RESULT_COUNT).await {
        Ok(response) => (response.total_count.unwrap_or(0), false),
        Err(error) => {
            warn!(tool = name, error = %error, "Popularity search failed; scoring as zero results");
            (0, true)
        }
    };
    PopularityLookup {
        search_count,
        score: calculate_popularity(search_count),
        failed,
    }
}

/// Scores every tool whose popularity is absent or the unknown default.
///
/// `max_tools` caps how many of those tools are processed in this run.
#[instrument(skip_all, fields(total = tools.len(), max_tools = ?max_tools))]
pub async fn backfill_popularity(
    tools: &mut [Tool],
    search: &dyn SearchApi,
    limiter: &RateLimiter,
    max_tools: Option<usize>,
    progress: &dyn Progress,
) -> PopularityReport {
    let mut targets: Vec<usize> = tools
        .iter()
        .enumerate()
        .filter(|(_, tool)| tool.needs_popularity())
        .map(|(index, _)| index)
        .collect();
    let mut report = PopularityReport {
        needing_scores: targets.len(),
        ..PopularityReport::default()
    };
    if let Some(limit) = max_tools.filter(|limit| *limit > 0) {
        targets.truncate(limit);
    }
    info!(
        needing = report.needing_scores,
        processing = targets.len(),
        "Tools need popularity scores"
    );

    progress.start(targets.len() as u64, "popularity");
    for index in targets {
        let tool = &mut tools[index];
        let lookup = search_popularity(search, limiter, &tool.name).await;
        tool.popularity = Some(lookup.score);
        report.updated += 1;
        if lookup.failed {
            report.failed += 1;
        }
        info!(
            tool = %tool.name,
            popularity = lookup.score,
            results = lookup.search_count,
            "Popularity assigned"
        );
        progress.advance(&tool.name);
    }
    progress.finish();
    report
}

/// The `limit` most popular tools, highest first; ties keep file order.
#[must_use]
pub fn top_by_popularity(tools: &[Tool], limit: usize) -> Vec<&Tool> {
    let mut ranked: Vec<&Tool> = tools.iter().collect();
    ranked.sort_by_key(|tool| std::cmp::Reverse(tool.popularity.unwrap_or(0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::{ApiError, SearchResponse};
    use crate::progress::NoProgress;
    use crate::tool::{Category, Pricing};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers with a per-query total count; queries not listed fail.
    struct CountingSearch {
        counts: Vec<(&'static str, u64)>,
        queries: Mutex<Vec<(String, u8)>>,
    }

    #[async_trait]
    impl SearchApi for CountingSearch {
        async fn search(&self, query: &str, count: u8) -> Result<SearchResponse, ApiError> {
            self.queries.lock().unwrap().push((query.to_string(), count));
            self.counts
                .iter()
                .find(|(q, _)| *q == query)
                .map(|(_, total)| SearchResponse {
                    results: Vec::new(),
                    total_count: Some(*total),
                })
                .ok_or_else(|| ApiError::http_status("search", 503))
        }
    }

    fn tool(name: &str, popularity: Option<u8>) -> Tool {
        let mut tool = Tool::new(name, Category::Chat, "d", Pricing::Free, "https://x.ai");
        tool.popularity = popularity;
        tool
    }

    #[tokio::test]
    async fn test_search_popularity_uses_name_query_and_five_results() {
        let search = CountingSearch {
            counts: vec![("Claude AI tool", 100)],
            queries: Mutex::new(Vec::new()),
        };
        let lookup = search_popularity(&search, &RateLimiter::disabled(), "Claude").await;
        assert_eq!(lookup.score, 70);
        assert!(!lookup.failed);
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            &[("Claude AI tool".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn test_search_failure_scores_fifty() {
        let search = CountingSearch {
            counts: Vec::new(),
            queries: Mutex::new(Vec::new()),
        };
        let lookup = search_popularity(&search, &RateLimiter::disabled(), "Nobody").await;
        assert_eq!(lookup.score, 50);
        assert_eq!(lookup.search_count, 0);
        assert!(lookup.failed);
    }

    #[tokio::test]
    async fn test_backfill_targets_absent_and_default_scores_only() {
        let search = CountingSearch {
            counts: vec![("A AI tool", 10), ("B AI tool", 1000)],
            queries: Mutex::new(Vec::new()),
        };
        let mut tools = vec![
            tool("A", None),
            tool("B", Some(50)),
            tool("C", Some(77)),
            tool("D", None),
        ];

        let report = backfill_popularity(
            &mut tools,
            &search,
            &RateLimiter::disabled(),
            None,
            &NoProgress,
        )
        .await;

        assert_eq!(report.needing_scores, 3);
        assert_eq!(report.updated, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(tools[0].popularity, Some(60));
        assert_eq!(tools[1].popularity, Some(80));
        assert_eq!(tools[2].popularity, Some(77));
        assert_eq!(tools[3].popularity, Some(50));
        assert_eq!(search.queries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_backfill_respects_max_tools() {
        let search = CountingSearch {
            counts: vec![("A AI tool", 10), ("B AI tool", 10)],
            queries: Mutex::new(Vec::new()),
        };
        let mut tools = vec![tool("A", None), tool("B", None)];
        let report = backfill_popularity(
            &mut tools,
            &search,
            &RateLimiter::disabled(),
            Some(1),
            &NoProgress,
        )
        .await;
        assert_eq!(report.needing_scores, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(tools[0].popularity, Some(60));
        assert_eq!(tools[1].popularity, None);
    }

    #[test]
    fn test_top_by_popularity_orders_descending() {
        let tools = vec![tool("Low", Some(55)), tool("None", None), tool("High", Some(90))];
        let names: Vec<&str> = top_by_popularity(&tools, 2)
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["High", "Low"]);
    }
}
