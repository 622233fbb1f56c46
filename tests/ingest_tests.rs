//! End-to-end tests for the fetch-and-ingest flow
//!
//! These tests use wiremock to stand in for the catalog's search endpoint
//! and drive the full cycle: paginated retrieval, mapping, and storage.

use foodfetch::config::ApiConfig;
use foodfetch::{ingest, CatalogClient, SqliteStorage, Storage};
use serde_json::{json, Value};
use std::time::Instant;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an API configuration pointed at the mock server, with intervals
/// short enough for tests
fn test_api_config(mock_uri: &str) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/cgi/search.pl", mock_uri),
        page_size: 2,
        min_request_interval_ms: 10,
        max_retries: 3,
        base_backoff_ms: 20,
        max_backoff_ms: 100,
        user_agent: "foodfetch-test/1.0".to_string(),
    }
}

/// Builds a complete raw product record
fn product(code: &str) -> Value {
    json!({
        "code": code,
        "product_name": format!("Product {code}"),
        "brands": "Test Brand",
        "packaging_text_en": "Glass jar",
        "created_t": 1_600_000_000,
        "last_modified_t": 1_600_000_001,
        "nutriments": {"energy-kcal_100g": 100.0, "fat_100g": 2.5},
        "ingredients_tags": ["en:sugar"],
        "categories": "Snacks, Sweet snacks",
        "countries_tags": ["en:france"]
    })
}

fn page_body(count: u64, products: Vec<Value>) -> Value {
    json!({"count": count, "products": products})
}

/// Mounts a search page mock for the given page number
async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_ingest_end_to_end() {
    let server = MockServer::start().await;

    // Three products across two pages, then an empty page ends the run.
    // The first-page mock also pins the request shape: search parameters
    // and the custom User-Agent must be present.
    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("search_terms", "chocolate"))
        .and(query_param("json", "1"))
        .and(query_param("search_simple", "1"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "2"))
        .and(header("user-agent", "foodfetch-test/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(3, vec![product("1001"), product("1002")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 2, page_body(3, vec![product("1003")])).await;
    mount_page(&server, 3, page_body(3, vec![])).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("products.db");
    let mut storage = SqliteStorage::new(&db_path).unwrap();

    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;
    assert_eq!(pager.total_count(), 3);

    let report = ingest(&mut pager, 3, &mut storage).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.saved, 3);
    assert_eq!(report.skipped(), 0);

    // Reopen and verify the persisted rows
    drop(storage);
    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_products().unwrap(), 3);
    assert_eq!(storage.count_nutrition_rows().unwrap(), 3);
    assert_eq!(storage.count_ingredient_rows().unwrap(), 3);
    assert_eq!(storage.count_category_rows().unwrap(), 6);
    assert_eq!(storage.count_country_rows().unwrap(), 3);
}

#[tokio::test]
async fn test_duplicate_skip_across_runs() {
    let server = MockServer::start().await;

    mount_page(&server, 1, page_body(2, vec![product("1001"), product("1002")])).await;
    mount_page(&server, 2, page_body(2, vec![])).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("products.db");

    // First run saves both products
    let mut storage = SqliteStorage::new(&db_path).unwrap();
    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;
    let report = ingest(&mut pager, 2, &mut storage).await.unwrap();
    assert_eq!(report.saved, 2);
    drop(storage);

    // Second run sees the same records and skips them all
    let mut storage = SqliteStorage::new(&db_path).unwrap();
    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;
    let report = ingest(&mut pager, 2, &mut storage).await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.saved, 0);
    assert_eq!(report.skipped(), 2);
    assert_eq!(storage.count_products().unwrap(), 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let server = MockServer::start().await;

    // Two transient failures, then success; mounted first so the failure
    // mock is consumed before the success mock starts matching
    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_page(&server, 1, page_body(1, vec![product("1001")])).await;
    mount_page(&server, 2, page_body(1, vec![])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;
    assert_eq!(pager.total_count(), 1);

    let report = ingest(&mut pager, 1, &mut storage).await.unwrap();
    assert_eq!(report.saved, 1);
}

#[tokio::test]
async fn test_midstream_page_failure_keeps_partial_results() {
    let server = MockServer::start().await;

    // Page 1 succeeds, page 2 always fails: the sequence ends early and
    // the page-1 records stay valid
    mount_page(&server, 1, page_body(4, vec![product("1001"), product("1002")])).await;
    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let mut config = test_api_config(&server.uri());
    config.max_retries = 1;

    let client = CatalogClient::new(config).unwrap();
    let mut pager = client.search("chocolate", None).await;
    let report = ingest(&mut pager, 4, &mut storage).await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.saved, 2);
    assert_eq!(storage.count_products().unwrap(), 2);
}

#[tokio::test]
async fn test_per_record_fault_isolation() {
    let server = MockServer::start().await;

    let records = vec![
        product("1001"),
        product("1002"),
        json!({"code": "", "product_name": "No barcode"}),
        product("1003"),
    ];
    mount_page(&server, 1, page_body(4, records)).await;
    mount_page(&server, 2, page_body(4, vec![])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;
    let report = ingest(&mut pager, 4, &mut storage).await.unwrap();

    assert_eq!(report.processed, 4);
    assert_eq!(report.saved, 3);
    assert_eq!(report.skipped(), 1);
}

#[tokio::test]
async fn test_count_parse_failure_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", None).await;

    assert_eq!(pager.total_count(), 0);

    let report = ingest(&mut pager, 0, &mut storage).await.unwrap();
    assert_eq!(report.processed, 0);
    assert_eq!(storage.count_products().unwrap(), 0);
}

#[tokio::test]
async fn test_max_pages_caps_the_run() {
    let server = MockServer::start().await;

    mount_page(&server, 1, page_body(6, vec![product("1001"), product("1002")])).await;
    // Page 2 exists upstream but must never be requested
    Mock::given(method("GET"))
        .and(path("/cgi/search.pl"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(6, vec![product("1003"), product("1004")])),
        )
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let client = CatalogClient::new(test_api_config(&server.uri())).unwrap();
    let mut pager = client.search("chocolate", Some(1)).await;
    let report = ingest(&mut pager, 6, &mut storage).await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(storage.count_products().unwrap(), 2);
}

#[tokio::test]
async fn test_rate_limit_floor_between_pages() {
    let server = MockServer::start().await;

    mount_page(&server, 1, page_body(2, vec![product("1001")])).await;
    mount_page(&server, 2, page_body(2, vec![product("1002")])).await;
    mount_page(&server, 3, page_body(2, vec![])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("products.db")).unwrap();

    let mut config = test_api_config(&server.uri());
    config.min_request_interval_ms = 150;

    let start = Instant::now();
    let client = CatalogClient::new(config).unwrap();
    let mut pager = client.search("chocolate", None).await;
    let report = ingest(&mut pager, 2, &mut storage).await.unwrap();

    // Three requests were issued; two full intervals must separate them
    assert_eq!(report.saved, 2);
    assert!(
        start.elapsed() >= std::time::Duration::from_millis(300),
        "requests were issued faster than the configured interval"
    );
}
