//! Feishu Open API client.
//!
//! Two calls make up a fetch cycle:
//!
//! 1. exchange the app credentials for a `tenant_access_token`
//! 2. read one bounded page of records from a Bitable table
//!
//! The token is requested anew for every cycle; caching happens one level up
//! on the record list (see [`CachedSource`](crate::source::CachedSource)).
//! The infallible [`FeishuClient::fetch_credential`] and
//! [`FeishuClient::fetch_records`] log the failure cause and degrade to "no
//! data"; the `try_*` variants return it.

use std::time::Duration;

use almanac_core::RawRecord;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default Open API host.
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Default page size for the records request.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size the records endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

/// Connection settings for [`FeishuClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Open API host, without trailing slash.
    pub base_url: String,
    /// App identifier.
    pub app_id: String,
    /// App secret.
    pub app_secret: String,
    /// Bitable app (base) token.
    pub base_id: String,
    /// Table identifier within the base.
    pub table_id: String,
    /// Records per request; clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for the given credentials and table, with default host,
    /// page size, and timeout.
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        base_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_id: base_id.into(),
            table_id: table_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> almanac_core::Result<()> {
        let required = [
            ("app_id", &self.app_id),
            ("app_secret", &self.app_secret),
            ("base_id", &self.base_id),
            ("table_id", &self.table_id),
            ("base_url", &self.base_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(almanac_core::Error::config(format!("{name} must be set")));
            }
        }
        Ok(())
    }

    /// Page size actually sent.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<RecordsData>,
}

#[derive(Debug, Deserialize)]
struct RecordsData {
    #[serde(default)]
    items: Option<Vec<RawRecord>>,
}

/// Feishu Open API client for one Bitable table.
#[derive(Clone, Debug)]
pub struct FeishuClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl FeishuClient {
    /// Create a client after validating `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Obtain a tenant access token, or `None` if the exchange fails.
    pub async fn fetch_credential(&self) -> Option<String> {
        match self.try_fetch_credential().await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Credential exchange failed: {e}");
                None
            }
        }
    }

    /// Obtain a tenant access token.
    pub async fn try_fetch_credential(&self) -> Result<String> {
        let url = format!("{}{TOKEN_PATH}", self.base_url());
        let response = self
            .http
            .post(&url)
            .json(&TokenRequest {
                app_id: &self.config.app_id,
                app_secret: &self.config.app_secret,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                endpoint: "tenant_access_token",
                status: response.status().as_u16(),
            });
        }

        let body: TokenResponse = response.json().await?;
        if body.code != 0 {
            return Err(Error::api("tenant_access_token", body.code, body.msg));
        }
        body.tenant_access_token
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingToken)
    }

    /// Fetch one page of records; any failure yields an empty list.
    pub async fn fetch_records(&self) -> Vec<RawRecord> {
        let Some(token) = self.fetch_credential().await else {
            return Vec::new();
        };

        match self.try_fetch_records_with(&token).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Record fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// Fetch one page of records, exchanging credentials first.
    pub async fn try_fetch_records(&self) -> Result<Vec<RawRecord>> {
        let token = self.try_fetch_credential().await?;
        self.try_fetch_records_with(&token).await
    }

    async fn try_fetch_records_with(&self, token: &str) -> Result<Vec<RawRecord>> {
        let url = format!(
            "{}/open-apis/bitable/v1/apps/{}/tables/{}/records",
            self.base_url(),
            self.config.base_id,
            self.config.table_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("page_size", self.config.effective_page_size())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                endpoint: "records",
                status: response.status().as_u16(),
            });
        }

        let body: RecordsResponse = response.json().await?;
        if body.code != 0 {
            return Err(Error::api("records", body.code, body.msg));
        }

        let records = body.data.and_then(|d| d.items).unwrap_or_default();
        tracing::debug!(count = records.len(), "Fetched records");
        Ok(records)
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}
