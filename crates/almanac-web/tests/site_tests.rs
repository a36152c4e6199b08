//! End-to-end tests: mock Feishu API → client → cache → router → HTML.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{TOKEN_PATH, TestSite, item, mount_records, mount_token, records_path};

#[tokio::test]
async fn test_list_page_shows_every_record_in_order() {
    let site = TestSite::start().await;
    mount_token(&site.server, 1).await;
    mount_records(
        &site.server,
        json!([item("rec1", "Alpha"), item("rec2", "Beta"), item("rec3", "Gamma")]),
        1,
    )
    .await;

    let (status, body) = site.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<article class=\"card\">").count(), 3);

    let alpha = body.find("/article/rec1").unwrap();
    let beta = body.find("/article/rec2").unwrap();
    let gamma = body.find("/article/rec3").unwrap();
    assert!(alpha < beta && beta < gamma);

    assert!(body.contains("quote for Alpha"));
    assert!(body.contains("comment on Beta"));
}

#[tokio::test]
async fn test_credential_failure_renders_empty_list() {
    let site = TestSite::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 10003,
            "msg": "invalid param"
        })))
        .mount(&site.server)
        .await;
    mount_records(&site.server, json!([item("rec1", "Alpha")]), 0).await;

    let (status, body) = site.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<article class=\"card\">").count(), 0);
    assert!(body.contains("class=\"empty\""));
}

#[tokio::test]
async fn test_upstream_error_renders_empty_list() {
    let site = TestSite::start().await;
    mount_token(&site.server, 1).await;
    Mock::given(method("GET"))
        .and(path(records_path()))
        .respond_with(ResponseTemplate::new(502))
        .mount(&site.server)
        .await;

    let (status, body) = site.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<article class=\"card\">").count(), 0);
}

#[tokio::test]
async fn test_detail_page_and_not_found() {
    let site = TestSite::start().await;
    mount_token(&site.server, 1).await;
    mount_records(&site.server, json!([item("rec1", "Alpha")]), 1).await;

    let (status, body) = site.get("/article/rec1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Alpha</h1>"));
    assert!(body.contains("summary"));

    let (status, body) = site.get("/article/rec404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Almanac Test"));
}

#[tokio::test]
async fn test_records_cached_within_ttl() {
    let site = TestSite::start().await;
    mount_token(&site.server, 1).await;
    mount_records(&site.server, json!([item("rec1", "Alpha")]), 1).await;

    site.get("/").await;
    site.get("/article/rec1").await;
    site.clock.advance(Duration::from_secs(3599));
    let (_, body) = site.get("/").await;
    assert!(body.contains("Alpha"));
}

#[tokio::test]
async fn test_records_refetched_after_ttl() {
    let site = TestSite::start().await;
    mount_token(&site.server, 2).await;
    mount_records(&site.server, json!([item("rec1", "Alpha")]), 2).await;

    site.get("/").await;
    site.clock.advance(Duration::from_secs(3600));
    let (status, _) = site.get("/").await;
    assert_eq!(status, StatusCode::OK);
}
