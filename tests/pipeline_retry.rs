//! Retry behavior of the execution pipeline: bounded exponential backoff for
//! transient failures, zero retries for terminal ones.

mod common;

use serde_json::json;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

use common::{ok_data, rate_limited, server_error, test_config, MockTransport};
use printavo_core::{PrintavoError, PrintavoService};

fn service_with(transport: Arc<MockTransport>) -> PrintavoService {
    PrintavoService::with_transport(&test_config(), transport).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_recovers_within_retry_budget() {
    let transport = Arc::new(MockTransport::sequence(vec![
        server_error(502),
        server_error(502),
        ok_data(json!({ "account": { "id": "1" } })),
    ]));
    let service = service_with(transport.clone());

    let started = Instant::now();
    let data = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap();

    assert_eq!(data["account"]["id"], "1");
    assert_eq!(transport.calls(), 3);
    // Two backoffs: 2s then 4s
    assert!(started.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_exhausted_after_five_attempts() {
    let transport = Arc::new(MockTransport::repeating(server_error(500)));
    let service = service_with(transport.clone());

    let started = Instant::now();
    let err = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PrintavoError::Api { status: 500, .. }));
    // Initial attempt plus five retries, never a sixth
    assert_eq!(transport.calls(), 6);
    // Backoff schedule 2 + 4 + 8 + 16 + 32 seconds
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(62));
    assert!(elapsed < Duration::from_secs(63));
}

#[tokio::test(start_paused = true)]
async fn test_authentication_failure_is_never_retried() {
    let transport = Arc::new(MockTransport::repeating(server_error(401)));
    let service = service_with(transport.clone());

    let err = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PrintavoError::Authentication(_)));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_graphql_validation_error_is_never_retried() {
    let transport = Arc::new(MockTransport::repeating(printavo_core::WireResponse {
        status: 200,
        retry_after: None,
        body: json!({ "errors": [{ "message": "Validation failed: first must be positive" }] }),
    }));
    let service = service_with(transport.clone());

    let err = service
        .execute_graphql("query ListOrders { invoices { edges { node { id } } } }", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, PrintavoError::Validation(_)));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_resets_after_success() {
    // Fail twice, succeed, then fail five more times and succeed again: the
    // second chain gets a fresh budget instead of inheriting the first's use.
    let transport = Arc::new(MockTransport::sequence(vec![
        server_error(503),
        server_error(503),
        ok_data(json!({ "ok": 1 })),
        server_error(503),
        server_error(503),
        server_error(503),
        server_error(503),
        server_error(503),
        ok_data(json!({ "ok": 2 })),
    ]));
    let service = service_with(transport.clone());

    let first = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap();
    assert_eq!(first["ok"], 1);

    let second = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap();
    assert_eq!(second["ok"], 2);
    assert_eq!(transport.calls(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_holds_then_request_retries_through_queue() {
    let transport = Arc::new(MockTransport::sequence(vec![
        rate_limited(Some(7)),
        ok_data(json!({ "ok": true })),
    ]));
    let service = service_with(transport.clone());

    let started = Instant::now();
    let data = service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap();

    assert_eq!(data["ok"], true);
    assert_eq!(transport.calls(), 2);
    assert!(started.elapsed() >= Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_without_header_uses_default_window() {
    let transport = Arc::new(MockTransport::sequence(vec![
        rate_limited(None),
        ok_data(json!({ "ok": true })),
    ]));
    let service = service_with(transport.clone());

    let started = Instant::now();
    service
        .execute_graphql("query GetAccount { account { id } }", json!({}))
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(60));
}
