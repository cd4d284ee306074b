//! # Printavo Service
//!
//! Wires the cache, rate-limit state, queue, pipeline, and resolver into the
//! narrow interface external callers use. One service instance per process is
//! the expected deployment shape — the upstream rate limit is per credential,
//! so every caller must share the same state — but each piece is an ordinary
//! constructor-injected value, and tests build fresh instances freely.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, info};

use crate::cache::{TtlCache, SEARCH_TTL};
use crate::client::rate_limit::RateLimitState;
use crate::client::transport::{GraphQlTransport, HttpTransport};
use crate::client::PrintavoClient;
use crate::config::PrintavoConfig;
use crate::error::{PrintavoError, PrintavoResult};
use crate::models::{Account, Connection, Order};
use crate::operations::{queries, SearchParams};
use crate::queue::RequestQueue;
use crate::resolver::VisualIdResolver;

/// The Printavo client core: rate-limited execution, request queueing,
/// caching, and visual-ID resolution behind one narrow surface.
#[derive(Debug, Clone)]
pub struct PrintavoService {
    client: PrintavoClient,
    queue: RequestQueue,
    cache: Arc<TtlCache>,
    resolver: VisualIdResolver,
}

impl PrintavoService {
    /// Build a service from environment configuration with the HTTP
    /// transport. The usual production entry point.
    pub fn from_env() -> PrintavoResult<Self> {
        let config = PrintavoConfig::from_env()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(&config, transport)
    }

    /// Build a service over an explicit transport. Tests inject mocks here;
    /// production goes through [`PrintavoService::from_env`].
    pub fn with_transport(
        config: &PrintavoConfig,
        transport: Arc<dyn GraphQlTransport>,
    ) -> PrintavoResult<Self> {
        config.validate()?;

        let rate_limit = Arc::new(RateLimitState::new());
        let cache = Arc::new(TtlCache::with_default_ttl(Duration::from_millis(
            config.default_cache_ttl_ms,
        )));
        let client = PrintavoClient::new(transport, rate_limit.clone());
        let queue = RequestQueue::new(rate_limit);
        let resolver = VisualIdResolver::new(client.clone(), queue.clone(), cache.clone());

        info!(api_url = %config.api_url, "Printavo service initialized");

        Ok(Self {
            client,
            queue,
            cache,
            resolver,
        })
    }

    /// The shared TTL cache
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// The shared request queue
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// Execute an arbitrary GraphQL document through the queue and pipeline.
    ///
    /// This is the escape hatch for operations the typed surface does not
    /// cover; it returns the raw `data` payload.
    pub async fn execute_graphql(
        &self,
        query: impl Into<String>,
        variables: Value,
    ) -> PrintavoResult<Value> {
        let query: Arc<str> = Arc::from(query.into());
        let client = self.client.clone();
        self.queue
            .add(move || {
                let client = client.clone();
                let query = Arc::clone(&query);
                let variables = variables.clone();
                async move { client.execute(&query, variables).await }
            })
            .await
    }

    /// Resolve an order by its human-facing visual ID via the tiered
    /// resolver (invoices, then quotes, then orders).
    pub async fn order_by_visual_id(&self, visual_id: &str) -> PrintavoResult<Order> {
        self.resolver.resolve(visual_id).await
    }

    /// Search orders. Results are cached for two minutes per parameter set —
    /// searches go stale faster than direct lookups.
    pub async fn search_orders(&self, params: &SearchParams) -> PrintavoResult<Connection<Order>> {
        let cache_key = params.cache_key();
        if let Some(hit) = self.cache.get(&cache_key) {
            debug!(cache_key = %cache_key, "Search served from cache");
            return decode(hit);
        }

        let data = self
            .execute_graphql(queries::SEARCH_ORDERS, params.to_variables())
            .await?;
        let connection = data.get("orders").cloned().unwrap_or(json!({ "edges": [] }));

        self.cache
            .set(cache_key, connection.clone(), Some(SEARCH_TTL));
        decode(connection)
    }

    /// Fetch an order by internal id. Fails `NotFound` when the id does not
    /// exist (the API returns a null node rather than an error).
    pub async fn get_order(&self, id: &str) -> PrintavoResult<Order> {
        self.get_node(queries::GET_ORDER, "order", id).await
    }

    /// Fetch a quote by internal id
    pub async fn get_quote(&self, id: &str) -> PrintavoResult<Order> {
        self.get_node(queries::GET_QUOTE, "quote", id).await
    }

    /// Fetch an invoice by internal id
    pub async fn get_invoice(&self, id: &str) -> PrintavoResult<Order> {
        self.get_node(queries::GET_INVOICE, "invoice", id).await
    }

    /// List recent invoices
    pub async fn list_orders(&self, first: u32) -> PrintavoResult<Vec<Order>> {
        let data = self
            .execute_graphql(queries::LIST_ORDERS, json!({ "first": first }))
            .await?;
        let connection: Connection<Order> = decode(
            data.get("invoices")
                .cloned()
                .unwrap_or(json!({ "edges": [] })),
        )?;
        Ok(connection.into_nodes())
    }

    /// Probe the API with the account query to verify connectivity and
    /// credentials.
    pub async fn check_connection(&self) -> PrintavoResult<Account> {
        let data = self.execute_graphql(queries::GET_ACCOUNT, json!({})).await?;
        match data.get("account") {
            Some(account) if !account.is_null() => decode(account.clone()),
            _ => Err(PrintavoError::api_error(
                500,
                "API response did not contain account data",
            )),
        }
    }

    async fn get_node(&self, document: &str, field: &str, id: &str) -> PrintavoResult<Order> {
        if id.trim().is_empty() {
            return Err(PrintavoError::Validation(format!(
                "Invalid {field} ID: ID must be a non-empty string"
            )));
        }

        let data = self
            .execute_graphql(document, json!({ "id": id }))
            .await?;
        match data.get(field) {
            Some(node) if !node.is_null() => decode(node.clone()),
            _ => Err(PrintavoError::NotFound(format!(
                "{field} with ID {id} not found"
            ))),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> PrintavoResult<T> {
    serde_json::from_value(value)
        .map_err(|e| PrintavoError::api_error(500, format!("Malformed API payload: {e}")))
}
