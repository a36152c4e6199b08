//! Site configuration.
//!
//! Configuration comes from a TOML file, then environment variables on top.
//! Credentials have no built-in values: `app_id`, `app_secret`, `base_id` and
//! `table_id` must be supplied by the deployment, and [`SiteConfig::validate`]
//! rejects a configuration that lacks any of them.
//!
//! ```toml
//! [feishu]
//! app_id = "cli_xxx"
//! app_secret = "..."
//!
//! [table]
//! base_id = "bascnxxx"
//! table_id = "tblxxx"
//!
//! [server]
//! port = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use almanac_client::ClientConfig;
use almanac_client::client::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use almanac_core::FieldNames;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory name under the platform config dir.
pub const PROJECT_NAME: &str = "almanac";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ALMANAC_CONFIG";

const REDACTED: &str = "********";

/// Feishu app credentials and API host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeishuSection {
    /// App identifier (`FEISHU_APP_ID`).
    pub app_id: String,
    /// App secret (`FEISHU_APP_SECRET`).
    pub app_secret: String,
    /// Open API host.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FeishuSection {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which Bitable table to read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSection {
    /// Bitable app token (`BASE_ID`).
    pub base_id: String,
    /// Table identifier (`TABLE_ID`).
    pub table_id: String,
    /// Records fetched per refresh.
    pub page_size: u32,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            base_id: String::new(),
            table_id: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Cache lifetimes.
///
/// `data_ttl_secs` governs the record list. `default_ttl_secs` is the
/// general-purpose default carried over from earlier deployments; nothing
/// caches under it today.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Lifetime of the fetched record list.
    pub data_ttl_secs: u64,
    /// Default lifetime for other cached values.
    pub default_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            data_ttl_secs: 3600,
            default_ttl_secs: 300,
        }
    }
}

/// HTTP listener and page chrome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Bind address (`ALMANAC_HOST`).
    pub host: String,
    /// Bind port (`ALMANAC_PORT`).
    pub port: u16,
    /// Title shown in the page header.
    pub site_title: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            site_title: "Almanac".to_string(),
        }
    }
}

/// Complete site configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Feishu credentials.
    pub feishu: FeishuSection,
    /// Source table.
    pub table: TableSection,
    /// Source field names.
    pub fields: FieldNames,
    /// Cache lifetimes.
    pub cache: CacheSection,
    /// Listener settings.
    pub server: ServerSection,
}

impl SiteConfig {
    /// Resolve the config file path.
    ///
    /// An explicit path wins; otherwise `<config_dir>/almanac/config.toml`.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(p) => Some(PathBuf::from(p)),
            None => Self::default_config_path(),
        }
    }

    /// Platform default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// Load configuration from a file and the process environment.
    ///
    /// An explicit path must exist. A missing default file is not an error,
    /// so a deployment can configure everything through the environment.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path.display()))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Overlay values from the environment.
    ///
    /// `lookup` maps a variable name to its value; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("FEISHU_APP_ID") {
            self.feishu.app_id = v;
        }
        if let Some(v) = get("FEISHU_APP_SECRET") {
            self.feishu.app_secret = v;
        }
        if let Some(v) = get("BASE_ID") {
            self.table.base_id = v;
        }
        if let Some(v) = get("TABLE_ID") {
            self.table.table_id = v;
        }
        if let Some(v) = get("ALMANAC_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("ALMANAC_PORT") {
            self.server.port = v
                .parse()
                .map_err(|_| Error::config(format!("ALMANAC_PORT is not a valid port: {v}")))?;
        }
        Ok(())
    }

    /// Check that the configuration can run the site.
    pub fn validate(&self) -> Result<()> {
        self.client_config().validate()?;

        if self.table.page_size == 0 || self.table.page_size > MAX_PAGE_SIZE {
            return Err(Error::config(format!(
                "table.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.cache.data_ttl_secs == 0 {
            return Err(Error::config("cache.data_ttl_secs must be positive"));
        }
        if self.cache.default_ttl_secs == 0 {
            return Err(Error::config("cache.default_ttl_secs must be positive"));
        }
        if self.feishu.timeout_secs == 0 {
            return Err(Error::config("feishu.timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.feishu.app_id.clone(),
            self.feishu.app_secret.clone(),
            self.table.base_id.clone(),
            self.table.table_id.clone(),
        )
        .with_base_url(self.feishu.base_url.clone())
        .with_page_size(self.table.page_size)
        .with_timeout(Duration::from_secs(self.feishu.timeout_secs))
    }

    /// Lifetime of the cached record list.
    pub fn data_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.data_ttl_secs)
    }

    /// A copy safe to print: the app secret is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.feishu.app_secret.is_empty() {
            copy.feishu.app_secret = REDACTED.to_string();
        }
        copy
    }
}
