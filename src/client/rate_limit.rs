//! # Shared Rate-Limit State
//!
//! One instance per service, shared by the execution pipeline and the request
//! queue. The upstream rate limit is global to the API credential, so a 429
//! observed by any caller must pause every caller — sharing this state is the
//! point, not an accident.

use parking_lot::Mutex;
use tokio::time::{Duration, Instant};

/// Minimum gap between any two outbound requests
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Attempt ceiling for the pipeline's backoff loop
pub const MAX_RETRIES: u32 = 5;

/// Exponential backoff multiplier (seconds: 2, 4, 8, 16, 32)
pub const BACKOFF_BASE: u64 = 2;

/// Fallback when a 429 carries no parsable `Retry-After` header
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Default)]
struct Inner {
    reset_at: Option<Instant>,
    last_request_at: Option<Instant>,
    retry_count: u32,
}

/// Pacing stamp, rate-limit window, and retry counter for one credential.
#[derive(Debug, Default)]
pub struct RateLimitState {
    inner: Mutex<Inner>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a 429: outbound traffic pauses until `retry_after` seconds
    /// from now.
    pub fn set_rate_limited(&self, retry_after_secs: u64) {
        let mut inner = self.inner.lock();
        inner.reset_at = Some(Instant::now() + Duration::from_secs(retry_after_secs));
    }

    /// Time left in the current rate-limit window, if one is active.
    ///
    /// Clears the window as a side effect once it has elapsed — the
    /// rate-limited flag is never reset explicitly.
    pub fn remaining_wait(&self) -> Option<Duration> {
        let mut inner = self.inner.lock();
        match inner.reset_at {
            Some(reset_at) => {
                let now = Instant::now();
                if reset_at > now {
                    Some(reset_at - now)
                } else {
                    inner.reset_at = None;
                    None
                }
            }
            None => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.remaining_wait().is_some()
    }

    /// Remainder of the minimum inter-request gap, if the previous request
    /// started less than [`MIN_REQUEST_INTERVAL`] ago.
    pub fn pacing_delay(&self) -> Option<Duration> {
        let inner = self.inner.lock();
        let last = inner.last_request_at?;
        let elapsed = Instant::now() - last;
        if elapsed < MIN_REQUEST_INTERVAL {
            Some(MIN_REQUEST_INTERVAL - elapsed)
        } else {
            None
        }
    }

    /// Stamp the start of an outbound request for pacing purposes.
    pub fn mark_request_start(&self) {
        self.inner.lock().last_request_at = Some(Instant::now());
    }

    /// Claim the next retry slot. Returns the 1-based attempt number, or
    /// `None` once the ceiling is reached — the counter never exceeds
    /// [`MAX_RETRIES`].
    pub fn next_retry(&self) -> Option<u32> {
        let mut inner = self.inner.lock();
        if inner.retry_count < MAX_RETRIES {
            inner.retry_count += 1;
            Some(inner.retry_count)
        } else {
            None
        }
    }

    /// Reset the retry chain after any successful response.
    pub fn reset_retries(&self) {
        self.inner.lock().retry_count = 0;
    }

    #[cfg(test)]
    pub(crate) fn retry_count(&self) -> u32 {
        self.inner.lock().retry_count
    }
}
