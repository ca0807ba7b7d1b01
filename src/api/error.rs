//! Error types for third-party API calls.
//!
//! Follows the What/Why/Suggestion message pattern used across the project.

use thiserror::Error;

/// Errors that can occur while calling the search, completion or logo services.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("cannot build HTTP client for {service}: {reason}")]
    ClientBuild {
        /// Service the client was meant for
        service: String,
        /// Underlying builder failure
        reason: String,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{service} request failed: {reason}\n  Suggestion: Check your network connection")]
    Transport {
        /// Service that was being called
        service: String,
        /// Underlying transport failure
        reason: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {reason}\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// Service that was being called
        service: String,
        /// HTTP status code
        status: u16,
        /// Short description of the status
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected {service} response: {reason}")]
    InvalidResponse {
        /// Service that was being called
        service: String,
        /// What was wrong with the body
        reason: String,
    },
}

impl ApiError {
    #[must_use]
    pub fn client_build(service: &str, reason: &str) -> Self {
        Self::ClientBuild {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn transport(service: &str, error: &reqwest::Error) -> Self {
        let reason = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        };
        Self::Transport {
            service: service.to_string(),
            reason,
        }
    }

    /// Creates an `HttpStatus` error with a status-specific suggestion.
    #[must_use]
    pub fn http_status(service: &str, status: u16) -> Self {
        let (reason, suggestion) = match status {
            401 | 403 => (
                "credentials rejected",
                "Check the API key environment variable",
            ),
            429 => (
                "rate limit exceeded",
                "Increase the delay between calls or try again later",
            ),
            s if s >= 500 => ("service unavailable", "Try again later"),
            _ => ("request rejected", "Check the request parameters"),
        };
        Self::HttpStatus {
            service: service.to_string(),
            status,
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_response(service: &str, reason: &str) -> Self {
        Self::InvalidResponse {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status carried by this error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
