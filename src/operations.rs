//! # Operations
//!
//! The GraphQL documents the core issues, the search parameter type, and the
//! visual-id text helpers callers use to decide whether an identifier needs
//! the tiered resolver.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Parameters for [`crate::PrintavoService::search_orders`].
///
/// `visual_id` takes precedence over `query` as the search term when both
/// are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_on: Option<String>,
}

impl SearchParams {
    /// Cache key derived from the full parameter set
    pub fn cache_key(&self) -> String {
        format!(
            "search_{}",
            serde_json::to_string(self).unwrap_or_default()
        )
    }

    /// GraphQL variables for the orders search document
    pub fn to_variables(&self) -> Value {
        json!({
            "query": self.visual_id.clone().or_else(|| self.query.clone()),
            "first": self.first.unwrap_or(10),
            "statusIds": self.status_ids,
            "sortOn": self.sort_on,
        })
    }
}

/// GraphQL documents. Field selections follow the Printavo v2 schema; the
/// three search documents are intentionally parallel so the resolver tiers
/// stay interchangeable.
pub mod queries {
    /// Tier 1: the documented invoices search endpoint
    pub const SEARCH_INVOICES: &str = r#"query SearchInvoices($query: String, $first: Int) {
  invoices(first: $first, query: $query) {
    edges {
      node {
        id
        visualId
        nickname
        total
        amountPaid
        amountOutstanding
        createdAt
        dueAt
        status { id name }
        contact { id fullName email phone }
      }
    }
  }
}"#;

    /// Tier 2: the documented quotes fallback
    pub const SEARCH_QUOTES: &str = r#"query SearchQuotes($query: String, $first: Int) {
  quotes(first: $first, query: $query) {
    edges {
      node {
        id
        visualId
        nickname
        total
        amountPaid
        amountOutstanding
        createdAt
        dueAt
        status { id name }
        contact { id fullName email phone }
      }
    }
  }
}"#;

    /// Tier 3: the generic orders endpoint (undocumented last resort).
    /// Orders is a union of Invoice and Quote, hence the inline fragments.
    pub const SEARCH_ORDERS: &str = r#"query SearchOrders($query: String, $first: Int, $statusIds: [ID!], $sortOn: String) {
  orders(first: $first, query: $query, statusIds: $statusIds, sortOn: $sortOn) {
    edges {
      node {
        ... on Invoice {
          id
          visualId
          nickname
          total
          amountPaid
          amountOutstanding
          createdAt
          dueAt
          status { id name }
          contact { id fullName email phone }
        }
        ... on Quote {
          id
          visualId
          nickname
          total
          status { id name }
          contact { id fullName email phone }
        }
      }
    }
  }
}"#;

    /// Direct lookup by internal id, full detail
    pub const GET_ORDER: &str = r#"query GetOrder($id: ID!) {
  order(id: $id) {
    ... on Invoice {
      id
      visualId
      nickname
      total
      amountPaid
      amountOutstanding
      createdAt
      dueAt
      status { id name }
      contact { id fullName email phone }
      lineItemGroups {
        edges {
          node {
            id
            name
            lineItems { edges { node { id name description quantity price } } }
          }
        }
      }
      transactions { edges { node { id amount transactedAt } } }
    }
    ... on Quote {
      id
      visualId
      nickname
      total
      status { id name }
      contact { id fullName email phone }
    }
  }
}"#;

    pub const GET_QUOTE: &str = r#"query GetQuote($id: ID!) {
  quote(id: $id) {
    id
    visualId
    nickname
    total
    amountPaid
    amountOutstanding
    createdAt
    dueAt
    status { id name }
    contact { id fullName email phone }
  }
}"#;

    pub const GET_INVOICE: &str = r#"query GetInvoice($id: ID!) {
  invoice(id: $id) {
    id
    visualId
    nickname
    total
    amountPaid
    amountOutstanding
    createdAt
    dueAt
    status { id name }
    contact { id fullName email phone }
    lineItemGroups {
      edges {
        node {
          id
          name
          lineItems { edges { node { id name description quantity price } } }
        }
      }
    }
  }
}"#;

    pub const LIST_ORDERS: &str = r#"query ListOrders($first: Int, $sortOn: String) {
  invoices(first: $first, sortOn: $sortOn) {
    edges {
      node {
        id
        visualId
        nickname
        total
        createdAt
        dueAt
        status { id name }
        contact { id fullName email phone }
      }
    }
  }
}"#;

    /// Minimal account probe used by the connection health check
    pub const GET_ACCOUNT: &str = r#"query GetAccount {
  account {
    id
    companyName
    companyEmail
  }
}"#;
}

fn visual_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4,5}$").expect("valid visual id pattern"))
}

fn visual_id_context_patterns() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)\bvisual\s*id\s*[#:]\s*(\d{4,5})\b",
            r"(?i)\bvisual\s*id\s*(\d{4,5})\b",
            r"(?i)\border\s*[#:]\s*(\d{4,5})\b",
            r"(?i)\bfind\s*order\s*(\d{4,5})\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid visual id context pattern"))
        .collect()
    })
}

/// Whether a string looks like a visual ID (short numeric code, 4-5 digits)
/// rather than an opaque internal id.
pub fn is_visual_id(value: &str) -> bool {
    visual_id_pattern().is_match(value.trim())
}

/// Extract candidate visual IDs from free text.
///
/// Phrases that explicitly name an order ("order #1234", "visual id 1234")
/// win; otherwise every standalone 4-5 digit number is a candidate.
pub fn extract_visual_ids(text: &str) -> Vec<String> {
    for pattern in visual_id_context_patterns() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(id) = caps.get(1) {
                return vec![id.as_str().to_string()];
            }
        }
    }

    static BARE: OnceLock<Regex> = OnceLock::new();
    let bare = BARE.get_or_init(|| Regex::new(r"\b\d{4,5}\b").expect("valid digit pattern"));

    let mut seen = Vec::new();
    for m in bare.find_iter(text) {
        let id = m.as_str().to_string();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
