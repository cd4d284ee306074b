//! # Wire Models
//!
//! Order-like records returned by the Printavo API. Invoices, quotes, and
//! plain orders share one structural shape, so a single [`Order`] type covers
//! all three endpoints the resolver probes.
//!
//! Every field except the identifiers is optional: the three search tiers
//! return different subsets, and partial nodes must still deserialize.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generic connection edge, GraphQL cursor-pagination style
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// A generic connection wrapper (`{ edges: [{ node }] }`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Connection<T> {
    /// Unwrap the edge list into plain nodes
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// An order-like record: invoice, quote, or order.
///
/// `id` is the opaque system-assigned identifier used for direct lookups;
/// `visual_id` is the short human-facing code (typically 4-5 digits) that
/// requires the tiered resolver. The two are never interchangeable.
///
/// Monetary fields (`amount_outstanding` in particular) are
/// upstream-authoritative: this crate never recomputes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub visual_id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub amount_outstanding: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub line_item_groups: Option<Connection<LineItemGroup>>,
    #[serde(default)]
    pub transactions: Option<Connection<Transaction>>,
    /// Fields the caller requested but this crate does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub line_items: Option<Connection<LineItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub transacted_at: Option<String>,
}

/// Account summary returned by the connection health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_email: Option<String>,
}
