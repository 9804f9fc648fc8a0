//! Bubberstation source tests against a mocked HTTP API
//!
//! Run with: cargo test -p integration-tests --test bubber_tests

use centcom_common::HttpConfig;
use centcom_core::BanType;
use centcom_sync::{
    BanParser, BubberBanParser, BubberBanService, FetchError, ImportMode, SyncError,
};
use integration_tests::{engine, ids, importer, InMemoryBanStore};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `pages[n - 1]` for `?page=n`; `None` answers 503 and later pages get `[]`
async fn mount_pages(server: &MockServer, pages: Vec<Option<Value>>) {
    for (index, body) in pages.into_iter().enumerate() {
        let response = match body {
            Some(body) => ResponseTemplate::new(200).set_body_json(body),
            None => ResponseTemplate::new(503),
        };
        Mock::given(method("GET"))
            .and(path("/api/bans"))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(response)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/api/bans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Page numbers requested so far, in arrival order
async fn requested_pages(server: &MockServer) -> Vec<u32> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse().ok())
        })
        .collect()
}

fn parser_for(server: &MockServer) -> BubberBanParser {
    let service = BubberBanService::new(server.uri(), &HttpConfig::default()).unwrap();
    BubberBanParser::new(service).unwrap()
}

#[tokio::test]
async fn test_fetch_page_decodes_records() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        vec![Some(json!([
            { "id": 2, "ckey": "Player_Two", "a_ckey": "admin", "bantime": "2024-04-02 10:00:00", "roles": ["Server"] },
            "garbage",
            { "id": 1, "ckey": "playerone", "bantime": "2024-04-01 10:00:00", "roles": ["Captain"] }
        ]))],
    )
    .await;
    let parser = parser_for(&server);

    let records = parser.fetch_page(1).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(requested_pages(&server).await, vec![1]);
}

#[tokio::test]
async fn test_error_status_is_fetch_error() {
    let server = MockServer::start().await;
    mount_pages(&server, vec![None]).await;
    let parser = parser_for(&server);

    match parser.fetch_page(1).await {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/api/bans?page=1"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_incremental_crawl_over_http() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        vec![
            Some(json!({ "bans": [
                { "id": 12, "ckey": "a", "bantime": "2024-04-03 00:00:00", "role": "Janitor" },
                { "id": 11, "ckey": "b", "bantime": "2024-04-02 00:00:00", "expiration_time": "later" }
            ]})),
            Some(json!({ "bans": [
                { "id": 10, "ckey": "c", "bantime": "2024-04-01T00:00:00Z", "unbanned_ckey": "mod" },
                { "ckey": "noid", "bantime": "2024-04-01 00:00:00" }
            ]})),
        ],
    )
    .await;

    let store = InMemoryBanStore::new();
    let engine = engine(parser_for(&server), &store);
    let report = engine.crawl_new().await.unwrap();

    // 11 has an unreadable expiry and the last record has no id
    assert_eq!(ids(&report.bans), vec!["12", "10"]);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.bans[0].ban_type, BanType::Job);
    assert_eq!(report.bans[1].unbanned_by.as_deref(), Some("mod"));
    assert_eq!(report.bans[1].source.name, "bubberstation");
    assert_eq!(requested_pages(&server).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_wrong_typed_optional_fields_are_tolerated() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        vec![Some(json!([
            { "id": 3, "ckey": "a", "bantime": "2024-04-03 00:00:00", "reason": 5, "roles": "Captain" },
            { "id": 2, "ckey": "b", "bantime": "2024-04-02 00:00:00", "unbanned_ckey": 0 }
        ]))],
    )
    .await;

    let store = InMemoryBanStore::new();
    let engine = engine(parser_for(&server), &store);
    let report = engine.crawl_new().await.unwrap();

    assert_eq!(ids(&report.bans), vec!["3", "2"]);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.bans[0].reason, "");
    assert_eq!(report.bans[0].ban_type, BanType::Job);
    assert_eq!(report.bans[1].unbanned_by, None);
}

#[tokio::test]
async fn test_server_error_aborts_import() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        vec![
            Some(json!([{ "id": 1, "ckey": "a", "bantime": "2024-04-01 00:00:00" }])),
            None,
        ],
    )
    .await;

    let store = InMemoryBanStore::new();
    let engine = engine(parser_for(&server), &store);
    let err = importer(&store).import(&engine, ImportMode::Incremental).await.unwrap_err();

    assert!(matches!(err, SyncError::Fetch(FetchError::Status { status: 503, .. })));
    assert!(store.bans().is_empty());
    assert_eq!(requested_pages(&server).await, vec![1, 2]);
}
