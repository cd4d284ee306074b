//! # GraphQL Execution Pipeline
//!
//! The single path every outbound request takes: rate-limit guard, pacing,
//! HTTP POST, response classification, and a bounded exponential-backoff
//! retry loop for transient failures.

pub mod rate_limit;
pub mod transport;

use serde_json::Value;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, warn};

use crate::error::{classify_graphql_errors, PrintavoError, PrintavoResult};
use rate_limit::{RateLimitState, BACKOFF_BASE, DEFAULT_RETRY_AFTER_SECS, MAX_RETRIES};
use transport::{GraphQlTransport, WireResponse};

/// Rate-limited GraphQL client for the Printavo API.
///
/// Cheap to clone; clones share the same transport and rate-limit state.
#[derive(Clone)]
pub struct PrintavoClient {
    transport: Arc<dyn GraphQlTransport>,
    rate_limit: Arc<RateLimitState>,
}

impl std::fmt::Debug for PrintavoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintavoClient")
            .field("transport", &self.transport.name())
            .field("rate_limited", &self.rate_limit.is_rate_limited())
            .finish()
    }
}

impl PrintavoClient {
    pub fn new(transport: Arc<dyn GraphQlTransport>, rate_limit: Arc<RateLimitState>) -> Self {
        Self {
            transport,
            rate_limit,
        }
    }

    /// Shared rate-limit state, for wiring into the request queue.
    pub fn rate_limit(&self) -> Arc<RateLimitState> {
        Arc::clone(&self.rate_limit)
    }

    /// Execute a GraphQL query or mutation and return its `data` payload.
    ///
    /// Transient failures (network faults, 5xx, generic GraphQL errors) are
    /// retried with exponential backoff — `BACKOFF_BASE ^ attempt` seconds,
    /// at most [`MAX_RETRIES`] retries. Authentication and validation
    /// failures surface immediately. Rate-limit failures also surface
    /// immediately so the queue (or a direct caller) can decide when to
    /// resubmit.
    pub async fn execute(&self, query: &str, variables: Value) -> PrintavoResult<Value> {
        // Outward-facing guard for callers bypassing the queue: while the
        // window is open this call must not reach the network.
        if let Some(wait) = self.rate_limit.remaining_wait() {
            let retry_after = wait.as_secs_f64().ceil() as u64;
            warn!(retry_after, "Rate limited, rejecting request before send");
            return Err(PrintavoError::RateLimit { retry_after });
        }

        loop {
            if let Some(delay) = self.rate_limit.pacing_delay() {
                sleep(delay).await;
            }
            self.rate_limit.mark_request_start();

            let result = match self.transport.post(query, &variables).await {
                Ok(response) => self.classify(response),
                Err(err) => Err(err),
            };

            match result {
                Ok(data) => {
                    self.rate_limit.reset_retries();
                    debug!("GraphQL request succeeded");
                    return Ok(data);
                }
                Err(err) if err.is_retryable() => match self.rate_limit.next_retry() {
                    Some(attempt) => {
                        let backoff = Duration::from_secs(BACKOFF_BASE.pow(attempt));
                        warn!(
                            error = %err,
                            attempt,
                            max_retries = MAX_RETRIES,
                            backoff_secs = backoff.as_secs(),
                            "Transient failure, retrying after backoff"
                        );
                        sleep(backoff).await;
                    }
                    None => {
                        error!(error = %err, retries = MAX_RETRIES, "Exhausted all retries");
                        return Err(err);
                    }
                },
                Err(err) => return Err(err),
            }
        }
    }

    /// Map a wire response onto the error taxonomy.
    fn classify(&self, response: WireResponse) -> PrintavoResult<Value> {
        match response.status {
            429 => {
                let retry_after = response.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                self.rate_limit.set_rate_limited(retry_after);
                warn!(retry_after, "Rate limited by Printavo API");
                Err(PrintavoError::RateLimit { retry_after })
            }
            401 => Err(PrintavoError::Authentication(
                "Authentication failed. Check your API credentials.".to_string(),
            )),
            status if !(200..300).contains(&status) => Err(PrintavoError::api_error(
                status,
                format!("GraphQL request failed: {}", body_text(&response.body)),
            )),
            _ => {
                if let Some(errors) = graphql_error_messages(&response.body) {
                    return Err(classify_graphql_errors(&errors));
                }
                Ok(response
                    .body
                    .get("data")
                    .cloned()
                    .unwrap_or(Value::Null))
            }
        }
    }
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract the messages of a non-empty GraphQL `errors` array, if any.
fn graphql_error_messages(body: &Value) -> Option<Vec<String>> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown error")
                    .to_string()
            })
            .collect(),
    )
}
