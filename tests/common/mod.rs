//! Shared test helpers: a scripted transport and config fixtures.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use printavo_core::error::{PrintavoError, PrintavoResult};
use printavo_core::{GraphQlTransport, PrintavoConfig, WireResponse};

/// Transport that replays a scripted sequence of wire responses and records
/// every query it was asked to send.
pub struct MockTransport {
    script: Mutex<VecDeque<WireResponse>>,
    /// When the script runs dry, keep replaying this
    fallback: Option<WireResponse>,
    operations: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl MockTransport {
    /// One response per call, in order. Calls past the end of the script
    /// fail loudly.
    pub fn sequence(responses: Vec<WireResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            operations: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// The same response for every call
    pub fn repeating(response: WireResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            operations: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Operation names of every query posted, in send order
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }
}

#[async_trait]
impl GraphQlTransport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn post(&self, query: &str, _variables: &Value) -> PrintavoResult<WireResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.operations.lock().push(operation_name(query));

        if let Some(response) = self.script.lock().pop_front() {
            return Ok(response);
        }
        match &self.fallback {
            Some(response) => Ok(response.clone()),
            None => Err(PrintavoError::Network(
                "mock transport script exhausted".to_string(),
            )),
        }
    }
}

/// `"query SearchInvoices($query: ...) { ... }"` -> `"SearchInvoices"`
fn operation_name(query: &str) -> String {
    query
        .split_whitespace()
        .nth(1)
        .unwrap_or("anonymous")
        .split('(')
        .next()
        .unwrap_or("anonymous")
        .to_string()
}

/// Wire response helpers in the shapes the API actually produces
pub fn ok_data(data: Value) -> WireResponse {
    WireResponse {
        status: 200,
        retry_after: None,
        body: serde_json::json!({ "data": data }),
    }
}

pub fn rate_limited(retry_after: Option<u64>) -> WireResponse {
    WireResponse {
        status: 429,
        retry_after,
        body: serde_json::json!({}),
    }
}

pub fn server_error(status: u16) -> WireResponse {
    WireResponse {
        status,
        retry_after: None,
        body: serde_json::json!({ "error": "internal error" }),
    }
}

/// Connection payload with the given nodes under `root_field`
pub fn search_page(root_field: &str, nodes: Vec<Value>) -> Value {
    let edges: Vec<Value> = nodes
        .into_iter()
        .map(|node| serde_json::json!({ "node": node }))
        .collect();
    serde_json::json!({ root_field: { "edges": edges } })
}

pub fn test_config() -> PrintavoConfig {
    PrintavoConfig {
        email: "shop@example.com".to_string(),
        token: "test-token".to_string(),
        ..Default::default()
    }
}
