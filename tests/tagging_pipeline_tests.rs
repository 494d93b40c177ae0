//! Integration tests for the tagging pipeline.
//!
//! These run the whole pipeline against a mock Admin API: enumeration with
//! the untagged filter, classification, tag writes, per-order failure
//! isolation, and the fatal inactive-session path.

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use order_tagger::tagging::{
    tag_untagged_orders, CountryMapping, CountryNames, RunSummary, TagSource,
};
use order_tagger::{AccessToken, ApiHost, AppConfig, Session, ShopDomain};

use std::collections::HashSet;

const ORDERS_PATH: &str = "/admin/api/2024-07/orders.json";

/// Creates a configuration pointed at the mock server.
fn mock_config(server: &MockServer) -> AppConfig {
    AppConfig::new(
        ShopDomain::new("test-shop").unwrap(),
        AccessToken::new("test-token").unwrap(),
    )
    .with_api_host(ApiHost::new(server.uri()).unwrap())
}

fn set(codes: &[&str]) -> HashSet<String> {
    codes.iter().map(ToString::to_string).collect()
}

fn category_source() -> TagSource {
    TagSource::Categories(CountryMapping::from_sets(set(&["SE"]), set(&["DE"])))
}

fn order(id: u64, country: Option<&str>, tags: &str) -> Value {
    let mut order = json!({"id": id, "tags": tags});
    if let Some(code) = country {
        order["shipping_address"] = json!({"country_code": code});
    }
    order
}

/// Mounts a single-page order listing.
async fn mount_order_listing(server: &MockServer, orders: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("status", "any"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": orders})))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a successful tag update for one order, pinning the exact body.
async fn mount_tag_update(server: &MockServer, id: u64, expected_tags: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/admin/api/2024-07/orders/{id}.json")))
        .and(body_json(json!({"order": {"id": id, "tags": expected_tags}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"order": {"id": id, "tags": expected_tags}})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pipeline_tags_orders_by_country_category() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::new(&config);

    mount_order_listing(
        &server,
        vec![
            order(1, Some("SE"), ""),
            order(2, Some("DE"), ""),
            order(3, Some("SE"), "vip"),
        ],
    )
    .await;

    mount_tag_update(&server, 1, "to_customer").await;
    mount_tag_update(&server, 2, "to_dragon").await;
    mount_tag_update(&server, 3, "vip, to_customer").await;

    let summary = tag_untagged_orders(&session, &config, &category_source())
        .await
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            updated: 3,
            skipped: 0,
            failed: 0,
        }
    );
}

#[tokio::test]
async fn pipeline_skips_orders_already_carrying_a_classification_tag() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::new(&config);

    mount_order_listing(
        &server,
        vec![
            order(1, Some("SE"), "to_customer"),
            order(2, Some("DE"), "vip, to_dragon"),
            order(3, Some("SE"), ""),
        ],
    )
    .await;

    mount_tag_update(&server, 3, "to_customer").await;

    let summary = tag_untagged_orders(&session, &config, &category_source())
        .await
        .unwrap();

    assert_eq!(summary.updated, 1);

    // Exactly one write happened: the filtered orders were never touched
    let requests = server.received_requests().await.unwrap();
    let writes: Vec<_> = requests
        .iter()
        .filter(|request| request.method.to_string() == "PUT")
        .collect();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].url.path(), "/admin/api/2024-07/orders/3.json");
}

#[tokio::test]
async fn pipeline_records_unclassifiable_orders_without_writing() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::new(&config);

    mount_order_listing(
        &server,
        vec![
            order(1, Some("JP"), ""), // not in either mapping column
            order(2, None, ""),       // no shipping address at all
        ],
    )
    .await;

    let summary = tag_untagged_orders(&session, &config, &category_source())
        .await
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            updated: 0,
            skipped: 2,
            failed: 0,
        }
    );

    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|request| request.method.to_string() == "GET"));
}

#[tokio::test]
async fn pipeline_isolates_a_failing_order_and_continues_the_batch() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::new(&config);

    mount_order_listing(
        &server,
        (1..=5).map(|id| order(id, Some("SE"), "")).collect(),
    )
    .await;

    mount_tag_update(&server, 1, "to_customer").await;
    // Order 2 fails with a validation error; 422 is not retried
    Mock::given(method("PUT"))
        .and(path("/admin/api/2024-07/orders/2.json"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"errors": {"tags": ["is invalid"]}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_tag_update(&server, 3, "to_customer").await;
    mount_tag_update(&server, 4, "to_customer").await;
    mount_tag_update(&server, 5, "to_customer").await;

    let summary = tag_untagged_orders(&session, &config, &category_source())
        .await
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            updated: 4,
            skipped: 0,
            failed: 1,
        }
    );
}

#[tokio::test]
async fn pipeline_tags_with_country_display_names() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::new(&config);

    mount_order_listing(
        &server,
        vec![order(1, Some("SE"), ""), order(2, Some("JP"), "")],
    )
    .await;

    mount_tag_update(&server, 1, "Sweden").await;

    let source = TagSource::Names(CountryNames::from_pairs([(
        "SE".to_string(),
        "Sweden".to_string(),
    )]));
    let summary = tag_untagged_orders(&session, &config, &source).await.unwrap();

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn inactive_session_prevents_every_remote_call() {
    let server = MockServer::start().await;
    let config = mock_config(&server);
    let session = Session::from_parts(ShopDomain::new("test-shop").unwrap(), String::new());

    let result = tag_untagged_orders(&session, &config, &category_source()).await;
    assert!(result.is_err());

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.is_empty(),
        "no enumeration or mutation call may be issued without an active session"
    );
}
