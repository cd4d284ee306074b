//! # Visual-ID Resolver
//!
//! Locates an order by its human-facing visual ID. The upstream system does
//! not guarantee a visual ID is unique or indexed by every endpoint, so the
//! resolver probes three search tiers in sequence — invoices (documented
//! primary), quotes (documented fallback), then the generic orders endpoint —
//! preferring an exact `visualId` match within each tier and falling back to
//! the first returned result. Tier errors are logged and swallowed so a
//! flaky primary endpoint never masks a hit further down; only after every
//! tier comes up empty does the lookup fail.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::client::PrintavoClient;
use crate::error::{PrintavoError, PrintavoResult};
use crate::models::Order;
use crate::operations::queries;
use crate::queue::RequestQueue;

/// One search endpoint the resolver can probe
#[derive(Debug, Clone, Copy)]
struct SearchTier {
    name: &'static str,
    root_field: &'static str,
    document: &'static str,
}

/// Probe order: documented primary first, undocumented last resort last
const TIERS: [SearchTier; 3] = [
    SearchTier {
        name: "invoices",
        root_field: "invoices",
        document: queries::SEARCH_INVOICES,
    },
    SearchTier {
        name: "quotes",
        root_field: "quotes",
        document: queries::SEARCH_QUOTES,
    },
    SearchTier {
        name: "orders",
        root_field: "orders",
        document: queries::SEARCH_ORDERS,
    },
];

/// Results fetched per tier; exact-match scanning happens client side
const TIER_RESULT_LIMIT: u32 = 5;

/// Tiered lookup of orders by visual ID, memoized in the shared cache.
#[derive(Debug, Clone)]
pub struct VisualIdResolver {
    client: PrintavoClient,
    queue: RequestQueue,
    cache: Arc<TtlCache>,
}

impl VisualIdResolver {
    pub fn new(client: PrintavoClient, queue: RequestQueue, cache: Arc<TtlCache>) -> Self {
        Self {
            client,
            queue,
            cache,
        }
    }

    /// Resolve a visual ID to an order, consulting the cache first.
    ///
    /// Fails with [`PrintavoError::NotFound`] once every tier has been
    /// exhausted, and [`PrintavoError::Validation`] for an empty input.
    pub async fn resolve(&self, visual_id: &str) -> PrintavoResult<Order> {
        let visual_id = visual_id.trim();
        if visual_id.is_empty() {
            return Err(PrintavoError::Validation(
                "Invalid visual ID: must be a non-empty string".to_string(),
            ));
        }

        let cache_key = format!("order_visual_id_{visual_id}");
        if let Some(hit) = self.cache.get(&cache_key) {
            debug!(visual_id, "Visual ID resolved from cache");
            return decode_order(hit);
        }

        for tier in &TIERS {
            match self.probe_tier(tier, visual_id).await {
                Ok(Some(node)) => {
                    info!(visual_id, tier = tier.name, "Visual ID resolved");
                    self.cache.set(cache_key, node.clone(), None);
                    return decode_order(node);
                }
                Ok(None) => {
                    debug!(visual_id, tier = tier.name, "No results in tier");
                }
                Err(err) => {
                    // Swallowed by design: a tier failure must not mask a
                    // hit in a later tier
                    warn!(visual_id, tier = tier.name, error = %err, "Tier lookup failed, falling through");
                }
            }
        }

        Err(PrintavoError::NotFound(format!(
            "Order with visual ID {visual_id} not found"
        )))
    }

    /// Search one tier, preferring an exact `visualId` match and falling
    /// back to the first returned edge.
    async fn probe_tier(&self, tier: &SearchTier, visual_id: &str) -> PrintavoResult<Option<Value>> {
        let client = self.client.clone();
        let document = tier.document;
        let variables = json!({ "query": visual_id, "first": TIER_RESULT_LIMIT });

        let data = self
            .queue
            .add(move || {
                let client = client.clone();
                let variables = variables.clone();
                async move { client.execute(document, variables).await }
            })
            .await?;

        let nodes: Vec<&Value> = data
            .get(tier.root_field)
            .and_then(|conn| conn.get("edges"))
            .and_then(Value::as_array)
            .map(|edges| edges.iter().filter_map(|e| e.get("node")).collect())
            .unwrap_or_default();

        if nodes.is_empty() {
            return Ok(None);
        }

        let exact = nodes
            .iter()
            .find(|n| n.get("visualId").and_then(Value::as_str) == Some(visual_id));

        match exact {
            Some(node) => Ok(Some((*node).clone())),
            // Best-effort: first result beats no result
            None => {
                debug!(
                    visual_id,
                    tier = tier.name,
                    "No exact match, using first result"
                );
                Ok(Some(nodes[0].clone()))
            }
        }
    }
}

fn decode_order(node: Value) -> PrintavoResult<Order> {
    serde_json::from_value(node)
        .map_err(|e| PrintavoError::api_error(500, format!("Malformed order payload: {e}")))
}
