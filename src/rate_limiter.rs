//! Per-service call pacing for third-party APIs.
//!
//! This module provides the [`RateLimiter`] struct which enforces a minimum
//! interval between consecutive calls to the same external service (search,
//! completion, logo probe). Different services are paced independently.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tooldex_core::RateLimiter;
//!
//! # async fn example() {
//! let limiter = RateLimiter::new(Duration::from_secs(1))
//!     .with_interval("search", Duration::from_secs(2));
//!
//! // First call to a service proceeds immediately
//! limiter.acquire("search").await;
//!
//! // Second call waits until two seconds have passed since the first
//! limiter.acquire("search").await;
//!
//! // Other services have their own clock
//! limiter.acquire("completion").await;
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Service key used for search API calls.
pub const SEARCH_SERVICE: &str = "search";
/// Service key used for chat-completion API calls.
pub const COMPLETION_SERVICE: &str = "completion";
/// Service key used for logo HEAD probes.
pub const LOGO_SERVICE: &str = "logo";

/// Default spacing between search calls.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 2000;
/// Default spacing between completion calls.
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 1000;
/// Default spacing between logo probes.
pub const DEFAULT_LOGO_DELAY_MS: u64 = 250;

/// Per-service minimum-interval limiter.
///
/// Calls are sequential in this tool, but the limiter is `Send + Sync` so it
/// can be shared behind an `Arc` without change.
#[derive(Debug)]
pub struct RateLimiter {
    /// Interval used for services without an explicit one.
    default_interval: Duration,

    /// Whether pacing is disabled entirely.
    disabled: bool,

    /// Per-service state. Arc lets the `DashMap` shard lock be released
    /// before awaiting the inner Mutex.
    services: DashMap<String, Arc<ServiceState>>,
}

#[derive(Debug)]
struct ServiceState {
    interval: Duration,
    /// `None` until the first call (first call is immediate).
    last_call: Mutex<Option<Instant>>,
}

impl ServiceState {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }
}

impl RateLimiter {
    /// Creates a limiter whose unknown services use `default_interval`.
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = default_interval.as_millis()))]
    pub fn new(default_interval: Duration) -> Self {
        debug!("creating rate limiter");
        Self {
            default_interval,
            disabled: false,
            services: DashMap::new(),
        }
    }

    /// Creates a limiter that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            default_interval: Duration::ZERO,
            disabled: true,
            services: DashMap::new(),
        }
    }

    /// Registers a specific interval for `service`.
    ///
    /// A zero interval leaves that service unpaced.
    #[must_use]
    pub fn with_interval(self, service: &str, interval: Duration) -> Self {
        self.services
            .insert(service.to_string(), Arc::new(ServiceState::new(interval)));
        self
    }

    /// Limiter with one interval per known service, in milliseconds.
    #[must_use]
    pub fn for_services(search_ms: u64, completion_ms: u64, logo_ms: u64) -> Self {
        Self::new(Duration::ZERO)
            .with_interval(SEARCH_SERVICE, Duration::from_millis(search_ms))
            .with_interval(COMPLETION_SERVICE, Duration::from_millis(completion_ms))
            .with_interval(LOGO_SERVICE, Duration::from_millis(logo_ms))
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the interval applied to `service`.
    #[must_use]
    pub fn interval_for(&self, service: &str) -> Duration {
        if self.disabled {
            return Duration::ZERO;
        }
        self.services
            .get(service)
            .map_or(self.default_interval, |state| state.interval)
    }

    /// Waits until `service` may be called again, then records the call.
    #[instrument(skip(self))]
    pub async fn acquire(&self, service: &str) {
        if self.disabled {
            return;
        }

        let state = self
            .services
            .entry(service.to_string())
            .or_insert_with(|| Arc::new(ServiceState::new(self.default_interval)))
            .clone();

        let mut last_call = state.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < state.interval {
                let delay = state.interval.saturating_sub(elapsed);
                debug!(service, delay_ms = delay.as_millis(), "pacing API call");
                tokio::time::sleep(delay).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
