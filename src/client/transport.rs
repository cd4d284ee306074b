//! # GraphQL Transport Abstraction
//!
//! The wire seam between the execution pipeline and the network. Production
//! uses [`HttpTransport`] (reqwest); tests substitute a scripted mock so the
//! pipeline, queue, and resolver can be exercised without a server.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::PrintavoConfig;
use crate::error::{PrintavoError, PrintavoResult};

/// A raw HTTP response from the GraphQL endpoint, before classification.
///
/// The pipeline owns the status/error taxonomy; the transport only reports
/// what came over the wire.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed `Retry-After` header in seconds, when present and numeric
    pub retry_after: Option<u64>,
    /// Response body: parsed JSON, or a JSON string of the raw text when the
    /// body was not valid JSON
    pub body: Value,
}

/// Transport-agnostic interface for issuing GraphQL POST requests.
///
/// Errors returned here are transport-level only (connection, timeout);
/// HTTP-level failures are successful [`WireResponse`]s with a non-2xx
/// status, classified by the caller.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Transport name for logging
    fn name(&self) -> &'static str;

    /// POST `{query, variables}` to the GraphQL endpoint
    async fn post(&self, query: &str, variables: &Value) -> PrintavoResult<WireResponse>;
}

/// reqwest-backed transport carrying the Printavo credential headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    ///
    /// The `email` and `token` headers are fixed per credential, so they are
    /// installed as default headers at construction.
    pub fn new(config: &PrintavoConfig) -> PrintavoResult<Self> {
        let mut default_headers = reqwest::header::HeaderMap::new();
        default_headers.insert(
            "email",
            config
                .email
                .parse()
                .map_err(|e| PrintavoError::config_error(format!("Invalid email header: {e}")))?,
        );
        default_headers.insert(
            "token",
            config
                .token
                .parse()
                .map_err(|e| PrintavoError::config_error(format!("Invalid token header: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("printavo-core/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                PrintavoError::config_error(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.graphql_endpoint(),
        })
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn post(&self, query: &str, variables: &Value) -> PrintavoResult<WireResponse> {
        debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| PrintavoError::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let text = response
            .text()
            .await
            .map_err(|e| PrintavoError::Network(format!("Failed to read response body: {e}")))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(WireResponse {
            status,
            retry_after,
            body,
        })
    }
}
