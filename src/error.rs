//! # Client Error Types
//!
//! Unified error taxonomy for the Printavo client core. Every failure that
//! crosses the crate boundary is one of these typed variants — callers never
//! see bare strings or raw HTTP statuses.

use thiserror::Error;

/// Client operation result type
pub type PrintavoResult<T> = Result<T, PrintavoError>;

/// Typed errors surfaced by the execution pipeline, queue, and resolver
#[derive(Debug, Clone, Error)]
pub enum PrintavoError {
    /// Credentials invalid or expired. Fatal: never retried.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Input rejected by the remote schema. Fatal: never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream rate limit hit. Recoverable: the queue re-queues the request
    /// and waits out the window; direct callers may resubmit after
    /// `retry_after` seconds.
    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimit { retry_after: u64 },

    /// No entity matched the lookup after exhausting every tier.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other HTTP-level failure. Transient: retried with backoff.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection refused, timeout, bad body).
    /// Transient: retried with backoff.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid configuration detected at construction time.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PrintavoError {
    /// Create an API error from an HTTP response
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the execution pipeline should retry this failure.
    ///
    /// Authentication and validation failures are final; rate limits are
    /// handled by the queue (or the caller), not the pipeline's backoff loop.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Network(_))
    }
}

/// Classify a GraphQL `errors` array into a typed error.
///
/// The upstream API does not return structured error codes, so the only
/// signal is the message text. The substring matching lives here and only
/// here — when Printavo ships error codes this is the one function to
/// replace.
pub fn classify_graphql_errors(messages: &[String]) -> PrintavoError {
    let joined = messages.join(", ");
    let lowered = joined.to_lowercase();

    if lowered.contains("authentication") || lowered.contains("unauthorized") {
        PrintavoError::Authentication(joined)
    } else if lowered.contains("validation") || lowered.contains("invalid") {
        PrintavoError::Validation(joined)
    } else {
        PrintavoError::api_error(400, format!("GraphQL errors: {joined}"))
    }
}
