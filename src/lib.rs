//! Tooldex Core Library
//!
//! This library provides the core functionality for the tooldex tool,
//! which discovers, deduplicates, classifies and cleans up the entries of an
//! AI tool directory stored as a flat JSON file.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`tool`] - Tool record, category/pricing enums, category scoring, popularity
//! - [`store`] - JSON file persistence and canonical ordering
//! - [`api`] - Search, chat-completion and logo-probe HTTP clients
//! - [`discovery`] - Candidate filtering, deduplication, classification and the discovery pipeline
//! - [`maintenance`] - Popularity/date backfills, description cleanup, recent listing
//! - [`config`] - File configuration and API credentials
//! - [`rate_limiter`] - Per-service call pacing
//! - [`progress`] - Progress hook for long loops

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod discovery;
pub mod maintenance;
pub mod progress;
pub mod rate_limiter;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub mod tool;
pub(crate) mod user_agent;
pub(crate) mod util;

// Re-export commonly used types
pub use api::{
    ApiError, BraveSearchClient, ChatCompletionClient, CompletionApi, CompletionRequest,
    HttpLogoProbe, LogoProbe, SearchApi, SearchResponse, SearchResult, configure_http_timeouts,
};
pub use config::{ConfigError, Credentials, FileConfig, LoadedConfig, VerbositySetting};
pub use discovery::{
    Candidate, DiscoveryOptions, DiscoveryPipeline, DiscoveryReport, KnownTools, LogoResolver,
    Rejection, SEARCH_QUERIES, extract_candidates, registrable_domain,
};
pub use progress::{NoProgress, Progress};
pub use rate_limiter::RateLimiter;
pub use store::{LoadState, StoreError, ToolStore, sort_tools};
pub use tool::{Category, Pricing, Tool, calculate_popularity, determine_category};
