//! Typed service operations: direct lookups, search caching, listing, and
//! the connection health probe.

mod common;

use serde_json::json;
use std::sync::Arc;
use tokio::time::Duration;

use common::{ok_data, search_page, test_config, MockTransport};
use printavo_core::{PrintavoError, PrintavoService, SearchParams};

fn service_with(transport: Arc<MockTransport>) -> PrintavoService {
    PrintavoService::with_transport(&test_config(), transport).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_get_order_returns_typed_order() {
    let transport = Arc::new(MockTransport::sequence(vec![ok_data(json!({
        "order": {
            "id": "SW52b2ljZS05OTk=",
            "visualId": "9435",
            "total": 1250.0,
            "amountOutstanding": 400.0,
            "status": { "id": "7", "name": "In Production" }
        }
    }))]));
    let service = service_with(transport);

    let order = service.get_order("SW52b2ljZS05OTk=").await.unwrap();
    assert_eq!(order.visual_id.as_deref(), Some("9435"));
    assert_eq!(order.amount_outstanding, Some(400.0));
    assert_eq!(order.status.unwrap().name, "In Production");
}

#[tokio::test(start_paused = true)]
async fn test_get_order_null_node_is_not_found() {
    let transport = Arc::new(MockTransport::sequence(vec![ok_data(
        json!({ "order": null }),
    )]));
    let service = service_with(transport);

    let err = service.get_order("bogus").await.unwrap_err();
    match err {
        PrintavoError::NotFound(message) => assert!(message.contains("bogus")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_get_order_rejects_blank_id_without_network() {
    let transport = Arc::new(MockTransport::repeating(ok_data(json!({}))));
    let service = service_with(transport.clone());

    let err = service.get_order("  ").await.unwrap_err();
    assert!(matches!(err, PrintavoError::Validation(_)));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_search_results_are_cached_for_two_minutes() {
    let transport = Arc::new(MockTransport::repeating(ok_data(search_page(
        "orders",
        vec![json!({ "id": "ord-1", "visualId": "9435" })],
    ))));
    let service = service_with(transport.clone());

    let params = SearchParams {
        query: Some("tees".to_string()),
        ..Default::default()
    };

    let first = service.search_orders(&params).await.unwrap();
    assert_eq!(first.edges.len(), 1);
    assert_eq!(transport.calls(), 1);

    // Within the TTL: served from cache
    tokio::time::advance(Duration::from_secs(60)).await;
    service.search_orders(&params).await.unwrap();
    assert_eq!(transport.calls(), 1);

    // Past the two-minute search TTL: fetched again
    tokio::time::advance(Duration::from_secs(61)).await;
    service.search_orders(&params).await.unwrap();
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_distinct_search_params_do_not_share_cache_entries() {
    let transport = Arc::new(MockTransport::repeating(ok_data(search_page(
        "orders",
        vec![],
    ))));
    let service = service_with(transport.clone());

    let tees = SearchParams {
        query: Some("tees".to_string()),
        ..Default::default()
    };
    let hoodies = SearchParams {
        query: Some("hoodies".to_string()),
        ..Default::default()
    };

    service.search_orders(&tees).await.unwrap();
    service.search_orders(&hoodies).await.unwrap();
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_list_orders_unwraps_connection_nodes() {
    let transport = Arc::new(MockTransport::sequence(vec![ok_data(search_page(
        "invoices",
        vec![
            json!({ "id": "inv-1", "visualId": "1001" }),
            json!({ "id": "inv-2", "visualId": "1002" }),
        ],
    ))]));
    let service = service_with(transport);

    let orders = service.list_orders(10).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].visual_id.as_deref(), Some("1002"));
}

#[tokio::test(start_paused = true)]
async fn test_check_connection_returns_account() {
    let transport = Arc::new(MockTransport::sequence(vec![ok_data(json!({
        "account": { "id": "acct-1", "companyName": "Ink & Thread" }
    }))]));
    let service = service_with(transport);

    let account = service.check_connection().await.unwrap();
    assert_eq!(account.company_name.as_deref(), Some("Ink & Thread"));
}

#[tokio::test(start_paused = true)]
async fn test_check_connection_fails_on_missing_account() {
    let transport = Arc::new(MockTransport::sequence(vec![ok_data(
        json!({ "account": null }),
    )]));
    let service = service_with(transport);

    let err = service.check_connection().await.unwrap_err();
    assert!(matches!(err, PrintavoError::Api { status: 500, .. }));
}

#[tokio::test(start_paused = true)]
async fn test_with_transport_rejects_missing_credentials() {
    let transport = Arc::new(MockTransport::repeating(ok_data(json!({}))));
    let config = printavo_core::PrintavoConfig::default();

    let err = PrintavoService::with_transport(&config, transport).unwrap_err();
    assert!(matches!(err, PrintavoError::Config(_)));
}
