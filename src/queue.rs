//! # Request Queue
//!
//! Serializes every outbound API call. Requests drain strictly FIFO through
//! a single processing loop, separated by the shared minimum inter-request
//! gap. When a request fails on the upstream rate limit it is re-inserted at
//! the **front** of the deque — it holds its place, the whole queue stalls
//! until the reset window clears, and no later request can jump ahead of it.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::client::rate_limit::RateLimitState;
use crate::error::{PrintavoError, PrintavoResult};

/// A queued request: a re-callable thunk plus the waiting caller's channel.
///
/// The thunk must be re-callable because a rate-limited request is retried
/// rather than rejected.
struct QueuedRequest {
    thunk: Arc<dyn Fn() -> BoxFuture<'static, PrintavoResult<Value>> + Send + Sync>,
    tx: oneshot::Sender<PrintavoResult<Value>>,
}

struct QueueInner {
    queue: Mutex<VecDeque<QueuedRequest>>,
    processing: AtomicBool,
    rate_limit: Arc<RateLimitState>,
}

/// FIFO request queue with rate-limit-aware draining.
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("depth", &self.inner.queue.lock().len())
            .field("processing", &self.inner.processing.load(Ordering::Acquire))
            .finish()
    }
}

impl RequestQueue {
    pub fn new(rate_limit: Arc<RateLimitState>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                queue: Mutex::new(VecDeque::new()),
                processing: AtomicBool::new(false),
                rate_limit,
            }),
        }
    }

    /// Enqueue a request and wait for its eventual outcome.
    ///
    /// The returned future settles when the thunk has actually run — after
    /// every earlier request, any active rate-limit window, and the pacing
    /// gap.
    pub async fn add<F, Fut>(&self, thunk: F) -> PrintavoResult<Value>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PrintavoResult<Value>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let request = QueuedRequest {
            thunk: Arc::new(move || Box::pin(thunk()) as BoxFuture<'static, _>),
            tx,
        };

        self.inner.queue.lock().push_back(request);
        self.ensure_draining();

        rx.await.unwrap_or_else(|_| {
            Err(PrintavoError::Network(
                "Request dropped before completion".to_string(),
            ))
        })
    }

    /// Number of requests currently waiting (excluding the one in flight).
    pub fn depth(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Spawn the drain loop unless one is already running.
    fn ensure_draining(&self) {
        if self
            .inner
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                drain(inner).await;
            });
        }
    }
}

async fn drain(inner: Arc<QueueInner>) {
    loop {
        let Some(request) = inner.queue.lock().pop_front() else {
            inner.processing.store(false, Ordering::Release);
            // An add() may have raced the empty check; reclaim the loop if so
            if inner.queue.lock().is_empty()
                || inner
                    .processing
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
            {
                return;
            }
            continue;
        };

        // Park until any active rate-limit window elapses
        if let Some(wait) = inner.rate_limit.remaining_wait() {
            warn!(
                wait_ms = wait.as_millis() as u64,
                "Queue paused for rate limit reset"
            );
            sleep(wait).await;
        }

        // Enforce the minimum gap since the previous request. The pipeline
        // stamps the pacing clock when it actually sends; stamping here too
        // would double the gap.
        if let Some(delay) = inner.rate_limit.pacing_delay() {
            sleep(delay).await;
        }

        let result = (request.thunk)().await;
        match result {
            Err(PrintavoError::RateLimit { retry_after }) => {
                // The request holds its place: back to the front, not the back
                warn!(retry_after, "Request rate limited, re-queueing at front");
                inner.rate_limit.set_rate_limited(retry_after);
                inner.queue.lock().push_front(request);
            }
            other => {
                debug!(ok = other.is_ok(), "Queued request settled");
                // Caller may have gone away; nothing to do then
                let _ = request.tx.send(other);
            }
        }
    }
}
