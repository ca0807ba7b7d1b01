//! Description quality detection and cleanup.
//!
//! Two cleanup paths exist. [`quick_fix_descriptions`] is a pure text pass that
//! needs no credentials. [`cleanup_descriptions`] asks the completion service
//! to rewrite every description [`needs_fixing`] flags.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, CompletionApi, CompletionRequest};
use crate::progress::Progress;
use crate::rate_limiter::{COMPLETION_SERVICE, RateLimiter};
use crate::tool::Tool;
use crate::util::{compile_static_regex, truncate_chars};

/// Descriptions shorter than this (in characters) are considered unusable.
pub const MIN_DESCRIPTION_CHARS: usize = 20;
/// Descriptions at or above this length are considered article excerpts.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

const REWRITE_TEMPERATURE: f32 = 0.3;
const REWRITE_MAX_TOKENS: u32 = 100;
const REWRITE_SYSTEM_PROMPT: &str =
    "You write concise, clear product descriptions. Return only the description text.";

static BAD_DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^we performed",
        r"(?i)^i tested",
        r"(?i)^this article",
        r"(?i)^in this",
        r"(?i)series of.*sprints",
        r"(\.\.\.|…)$",
    ]
    .into_iter()
    .map(compile_static_regex)
    .collect()
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"<[^>]*>"));
static REVIEW_LEAD_IN: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)^We performed.*?(?:winner|evaluation)\.\s*"));
static ELLIPSIS_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\.\.\.\s*[A-Z].*$"));
static TRAILING_ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\s*\.\.\.\s*$"));
static ARTICLE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)^(Explore|Discover|The Best|These AI|Create|Free)")
});
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"[.!?]+"));
static SURROUNDING_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"^["']|["']$"#));

/// Whether `description` is too short, too long, truncated or article-like.
#[must_use]
pub fn needs_fixing(description: &str) -> bool {
    let length = description.chars().count();
    length < MIN_DESCRIPTION_CHARS
        || length >= MAX_DESCRIPTION_CHARS
        || BAD_DESCRIPTION_PATTERNS
            .iter()
            .any(|pattern| pattern.is_match(description))
}

/// Placeholder description built from the alphabetic part of `name`.
#[must_use]
pub fn generated_description(name: &str) -> String {
    let letters: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    format!("AI-powered tool for {letters}")
}

/// Credential-free cleanup of one description.
///
/// Strips markup, review lead-ins and trailing ellipses, keeps the second
/// sentence of article-style openers, caps the length and falls back to
/// [`generated_description`] when too little text remains.
#[must_use]
pub fn clean_description(description: &str, name: &str) -> String {
    let mut cleaned = HTML_TAG.replace_all(description, "").into_owned();
    cleaned = REVIEW_LEAD_IN.replace(&cleaned, "").into_owned();
    cleaned = ELLIPSIS_FRAGMENT.replace(&cleaned, ".").into_owned();
    cleaned = TRAILING_ELLIPSIS.replace(&cleaned, "").into_owned();

    if ARTICLE_OPENER.is_match(&cleaned) {
        let second = SENTENCE_BREAK.split(&cleaned).nth(1).map(str::trim);
        if let Some(second) = second {
            cleaned = second.to_string();
        }
    }

    if cleaned.chars().count() > MAX_DESCRIPTION_CHARS {
        cleaned = format!("{}...", truncate_chars(&cleaned, MAX_DESCRIPTION_CHARS - 3));
    }

    if cleaned.chars().count() < MIN_DESCRIPTION_CHARS {
        cleaned = generated_description(name);
    }

    cleaned.trim().to_string()
}

/// Applies [`clean_description`] to every tool; returns how many changed.
#[instrument(skip(tools), fields(total = tools.len()))]
pub fn quick_fix_descriptions(tools: &mut [Tool]) -> usize {
    let mut changed = 0;
    for tool in tools.iter_mut() {
        let cleaned = clean_description(&tool.description, &tool.name);
        if cleaned != tool.description {
            debug!(tool = %tool.name, "Description cleaned");
            tool.description = cleaned;
            changed += 1;
        }
    }
    info!(changed, "Quick description cleanup finished");
    changed
}

/// Rewrite prompt for one tool.
#[must_use]
pub fn build_rewrite_prompt(tool: &Tool) -> String {
    format!(
        "Given this AI tool, write a clear, concise product description (max 120 characters).\n\
         \n\
         Tool: {name}\n\
         URL: {url}\n\
         Category: {category}\n\
         Current Description: {description}\n\
         Features: {features}\n\
         \n\
         Write a professional product description that:\n\
         - Is 1-2 sentences maximum\n\
         - Under 120 characters\n\
         - Describes what the tool DOES\n\
         - Is not an article excerpt\n\
         - Doesn't end with \"...\"\n\
         \n\
         Return ONLY the new description text, nothing else.",
        name = tool.name,
        url = tool.url,
        category = tool.category,
        description = tool.description,
        features = tool.features.join(", "),
    )
}

/// Asks the completion service for a new description of `tool`.
///
/// Surrounding quotes are removed and the answer is capped at
/// [`MAX_DESCRIPTION_CHARS`].
///
/// # Errors
///
/// Returns [`ApiError`] when the call fails or the answer is blank.
#[instrument(skip(api, tool), fields(tool = %tool.name))]
pub async fn rewrite_description(api: &dyn CompletionApi, tool: &Tool) -> Result<String, ApiError> {
    let request = CompletionRequest::new(
        build_rewrite_prompt(tool),
        REWRITE_TEMPERATURE,
        REWRITE_MAX_TOKENS,
    )
    .with_system(REWRITE_SYSTEM_PROMPT);
    let answer = api.complete(&request).await?;
    let unquoted = SURROUNDING_QUOTE.replace_all(answer.trim(), "");
    let rewritten = truncate_chars(unquoted.trim(), MAX_DESCRIPTION_CHARS);
    if rewritten.is_empty() {
        return Err(ApiError::invalid_response(
            "completion",
            "empty description rewrite",
        ));
    }
    Ok(rewritten.to_string())
}

/// Summary of an LLM description cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Tools flagged by [`needs_fixing`].
    pub needing_fix: usize,
    pub rewritten: usize,
    /// Rewrites that failed; those tools keep their description.
    pub failed: usize,
}

/// Rewrites every flagged description through the completion service.
///
/// Calls are sequential and spaced by the completion rate limit. A failed
/// rewrite leaves that description unchanged.
#[instrument(skip_all, fields(total = tools.len()))]
pub async fn cleanup_descriptions(
    tools: &mut [Tool],
    api: &dyn CompletionApi,
    limiter: &RateLimiter,
    progress: &dyn Progress,
) -> CleanupReport {
    let targets: Vec<usize> = tools
        .iter()
        .enumerate()
        .filter(|(_, tool)| needs_fixing(&tool.description))
        .map(|(index, _)| index)
        .collect();
    let mut report = CleanupReport {
        needing_fix: targets.len(),
        ..CleanupReport::default()
    };
    info!(needing = report.needing_fix, "Descriptions need rewriting");

    progress.start(targets.len() as u64, "descriptions");
    for index in targets {
        let tool = &mut tools[index];
        limiter.acquire(COMPLETION_SERVICE).await;
        match rewrite_description(api, tool).await {
            Ok(rewritten) => {
                tool.description = rewritten;
                report.rewritten += 1;
            }
            Err(error) => {
                warn!(
                    tool = %tool.name,
                    error = %error,
                    "Description rewrite failed; keeping original"
                );
                report.failed += 1;
            }
        }
        progress.advance(&tool.name);
    }
    progress.finish();
    report
}
