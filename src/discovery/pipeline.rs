//! The discovery batch job.

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, instrument, warn};

use crate::api::{CompletionApi, LogoProbe, SearchApi};
use crate::maintenance::popularity::search_popularity;
use crate::progress::Progress;
use crate::rate_limiter::{COMPLETION_SERVICE, RateLimiter, SEARCH_SERVICE};
use crate::tool::Tool;

use super::classifier::{ClassifyError, classify};
use super::{
    Candidate, KnownTools, LogoResolver, SEARCH_QUERIES, bad_content_reason, extract_candidates,
};

/// Default number of accepted tools per search phrase.
pub const DEFAULT_MAX_PER_QUERY: usize = 3;
/// Results requested per discovery search.
pub const DISCOVERY_RESULT_COUNT: u8 = 20;

/// Tunables for one discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Accepted tools per phrase before moving on.
    pub max_per_query: usize,
    pub results_per_query: u8,
    /// Search phrases, in order.
    pub queries: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_per_query: DEFAULT_MAX_PER_QUERY,
            results_per_query: DISCOVERY_RESULT_COUNT,
            queries: SEARCH_QUERIES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Why a candidate was not added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Raw title or URL matched an editorial-content pattern.
    BadContent(&'static str),
    /// Domain or name already known.
    Duplicate,
    /// The classifier call or its answer failed.
    Classification(String),
    /// The model judged the candidate not to be an AI tool.
    NotATool,
    /// The cleaned name matched an editorial-content pattern.
    CleanedBadContent(&'static str),
    /// The cleaned name is already known.
    CleanedDuplicate,
}

/// Counters and accepted tools from one run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub queries_run: usize,
    pub search_failures: usize,
    pub search_results: usize,
    pub candidates: usize,
    pub bad_content: usize,
    pub duplicates: usize,
    pub classifier_rejections: usize,
    /// Accepted tools, in acceptance order.
    pub accepted: Vec<Tool>,
}

impl DiscoveryReport {
    fn record(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::BadContent(_) | Rejection::CleanedBadContent(_) => self.bad_content += 1,
            Rejection::Duplicate | Rejection::CleanedDuplicate => self.duplicates += 1,
            Rejection::Classification(_) | Rejection::NotATool => {
                self.classifier_rejections += 1;
            }
        }
    }
}

/// Wires the external services and pacing into the candidate filter chain.
pub struct DiscoveryPipeline<'a> {
    search: &'a dyn SearchApi,
    completion: &'a dyn CompletionApi,
    logo_probe: &'a dyn LogoProbe,
    limiter: &'a RateLimiter,
    logos: LogoResolver,
    options: DiscoveryOptions,
}

impl<'a> DiscoveryPipeline<'a> {
    #[must_use]
    pub fn new(
        search: &'a dyn SearchApi,
        completion: &'a dyn CompletionApi,
        logo_probe: &'a dyn LogoProbe,
        limiter: &'a RateLimiter,
    ) -> Self {
        Self {
            search,
            completion,
            logo_probe,
            limiter,
            logos: LogoResolver::default(),
            options: DiscoveryOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_logo_resolver(mut self, logos: LogoResolver) -> Self {
        self.logos = logos;
        self
    }

    #[must_use]
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Runs every search phrase and returns the tools accepted.
    ///
    /// `existing` seeds the duplicate accumulator; it is not modified.
    #[instrument(skip_all, fields(existing = existing.len(), queries = self.options.queries.len()))]
    pub async fn run(&self, existing: &[Tool], progress: &dyn Progress) -> DiscoveryReport {
        let mut known = KnownTools::from_tools(existing);
        let mut report = DiscoveryReport::default();

        progress.start(self.options.queries.len() as u64, "discovery");
        for query in &self.options.queries {
            report.queries_run += 1;
            self.limiter.acquire(SEARCH_SERVICE).await;
            let results = match self
                .search
                .search(query, self.options.results_per_query)
                .await
            {
                Ok(response) => response.results,
                Err(error) => {
                    warn!(query = %query, error = %error, "Search failed; skipping phrase");
                    report.search_failures += 1;
                    progress.advance(query);
                    continue;
                }
            };
            report.search_results += results.len();

            let candidates = extract_candidates(&results);
            report.candidates += candidates.len();
            info!(
                query = %query,
                results = results.len(),
                candidates = candidates.len(),
                "Searched"
            );

            let mut added_from_query = 0;
            for candidate in &candidates {
                if added_from_query >= self.options.max_per_query {
                    debug!(
                        query = %query,
                        max = self.options.max_per_query,
                        "Reached per-query limit"
                    );
                    break;
                }
                match self.evaluate(candidate, &known).await {
                    Ok(tool) => {
                        info!(tool = %tool.name, category = %tool.category, "Added");
                        known.insert(&tool.name, &tool.url);
                        report.accepted.push(tool);
                        added_from_query += 1;
                    }
                    Err(rejection) => {
                        debug!(candidate = %candidate.name, ?rejection, "Rejected");
                        report.record(&rejection);
                    }
                }
            }
            progress.advance(query);
        }
        progress.finish();

        info!(
            queries = report.queries_run,
            candidates = report.candidates,
            duplicates = report.duplicates,
            accepted = report.accepted.len(),
            "Discovery finished"
        );
        report
    }

    /// Passes one candidate through the filter chain.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] of the first stage that refused the candidate.
    #[instrument(skip_all, fields(candidate = %candidate.name, url = %candidate.url))]
    pub async fn evaluate(
        &self,
        candidate: &Candidate,
        known: &KnownTools,
    ) -> Result<Tool, Rejection> {
        if let Some(pattern) = bad_content_reason(&candidate.title, &candidate.url) {
            return Err(Rejection::BadContent(pattern));
        }
        if known.is_duplicate(&candidate.url, &candidate.name) {
            return Err(Rejection::Duplicate);
        }

        self.limiter.acquire(COMPLETION_SERVICE).await;
        let classification = match classify(self.completion, candidate).await {
            Ok(classification) => classification,
            Err(ClassifyError::NotATool) => return Err(Rejection::NotATool),
            Err(error) => {
                warn!(error = %error, "Classification failed");
                return Err(Rejection::Classification(error.to_string()));
            }
        };

        if let Some(pattern) = bad_content_reason(&classification.name, &candidate.url) {
            return Err(Rejection::CleanedBadContent(pattern));
        }
        if known.is_duplicate(&candidate.url, &classification.name) {
            return Err(Rejection::CleanedDuplicate);
        }

        let logo = self
            .logos
            .resolve(
                &candidate.url,
                candidate.thumbnail.as_deref(),
                self.logo_probe,
                self.limiter,
            )
            .await;
        let popularity = search_popularity(self.search, self.limiter, &classification.name).await;

        let mut tool = Tool::new(
            classification.name,
            classification.category,
            classification.description,
            classification.pricing,
            candidate.url.clone(),
        )
        .with_features(classification.features);
        tool.logo = logo;
        tool.popularity = Some(popularity.score);
        tool.date_added = Some(Utc::now().trunc_subsecs(3));
        Ok(tool)
    }
}
