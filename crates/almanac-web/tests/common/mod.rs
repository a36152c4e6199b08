//! Shared harness for end-to-end site tests against a mock Feishu API.

use std::sync::Arc;

use almanac_client::{CachedSource, ClientConfig, FeishuClient};
use almanac_core::{Cache, ManualClock, MemoryCache, Projector, RawRecord};
use almanac_web::{AppState, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BASE_ID: &str = "bascnSite";
pub const TABLE_ID: &str = "tblSite";
pub const TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

pub fn records_path() -> String {
    format!("/open-apis/bitable/v1/apps/{BASE_ID}/tables/{TABLE_ID}/records")
}

/// A site wired to a mock Feishu server, with a hand-driven cache clock.
pub struct TestSite {
    pub server: MockServer,
    pub clock: Arc<ManualClock>,
    pub app: Router,
}

impl TestSite {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let clock = Arc::new(ManualClock::new());

        let config = ClientConfig::new("cli_site", "secret", BASE_ID, TABLE_ID)
            .with_base_url(server.uri());
        let client = FeishuClient::new(config).unwrap();
        let cache: Arc<dyn Cache<Vec<RawRecord>>> =
            Arc::new(MemoryCache::<Vec<RawRecord>>::with_clock(clock.clone()));
        let source = CachedSource::new(client, cache);

        let app = router(AppState::new(
            Arc::new(source),
            Projector::default(),
            "Almanac Test",
        ));

        Self { server, clock, app }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "ok",
            "tenant_access_token": "t-site",
            "expire": 7200
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_records(server: &MockServer, items: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(records_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": {"has_more": false, "items": items}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// A Bitable item with the default field names.
pub fn item(id: &str, title: &str) -> Value {
    json!({
        "record_id": id,
        "fields": {
            "标题": title,
            "金句输出": [{"text": format!("quote for {title}"), "type": "text"}],
            "黄叔点评": format!("[{{'text': 'comment on {title}', 'type': 'text'}}]"),
            "概要内容输出": "{\"text\": \"summary\", \"type\": \"text\"}"
        }
    })
}
