//! Discovery of new directory entries.
//!
//! A single sequential batch: each fixed search phrase is sent to the search
//! API, hits are turned into [`Candidate`]s, and every candidate passes through
//! the content filter, duplicate check, classifier, post-classification
//! re-checks, logo resolution and popularity lookup before it is accepted.

mod candidate;
pub mod classifier;
mod dedupe;
mod logo;
mod pipeline;

pub use candidate::{
    BLOCKED_DOMAINS, Candidate, bad_content_reason, clean_candidate_name, extract_candidates,
    is_bad_candidate, is_blocked_domain,
};
pub use classifier::{Classification, ClassifyError, classify};
pub use dedupe::{KnownTools, registrable_domain};
pub use logo::{DEFAULT_LOGO_SERVICE_URL, LogoResolver};
pub use pipeline::{
    DEFAULT_MAX_PER_QUERY, DISCOVERY_RESULT_COUNT, DiscoveryOptions, DiscoveryPipeline,
    DiscoveryReport, Rejection,
};

/// Search phrases run by every discovery pass, in order.
pub const SEARCH_QUERIES: [&str; 25] = [
    // specific categories
    "new AI chatbot 2025",
    "AI image generator tool",
    "AI video creation platform",
    "AI coding assistant",
    "AI writing tool",
    "AI voice generator",
    "AI music generator",
    "AI productivity tool",
    "AI design tool",
    "AI research assistant",
    // emerging categories
    "AI avatar generator",
    "AI presentation maker",
    "AI data analysis tool",
    "AI meeting assistant",
    "AI note taking app",
    "AI email assistant",
    "AI social media tool",
    "AI marketing automation",
    "AI customer support",
    "AI translation tool",
    // trending
    "best free AI tools 2025",
    "AI tools for developers",
    "AI tools for content creators",
    "AI automation platform",
    "generative AI application",
];
