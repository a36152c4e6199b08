//! Site server: wires the client, cache, and router, then serves HTTP.

use std::sync::Arc;

use almanac_client::{CachedSource, FeishuClient};
use almanac_core::{Cache, MemoryCache, Projector, RawRecord};
use tokio::net::TcpListener;

use crate::config::SiteConfig;
use crate::routes::{AppState, router};
use crate::{Error, Result};

/// Almanac web server
pub struct Server {
    config: SiteConfig,
}

impl Server {
    /// Create a server from a validated configuration.
    pub fn new(config: SiteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this server runs with.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Build router state: a Feishu client behind a fresh record cache.
    pub fn state(&self) -> Result<AppState> {
        let client = FeishuClient::new(self.config.client_config())?;
        let cache: Arc<dyn Cache<Vec<RawRecord>>> =
            Arc::new(MemoryCache::<Vec<RawRecord>>::new());
        let source = CachedSource::new(client, cache).with_ttl(self.config.data_ttl());

        Ok(AppState::new(
            Arc::new(source),
            Projector::new(self.config.fields.clone()),
            self.config.server.site_title.clone(),
        ))
    }

    /// Bind the listener and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let app = router(self.state()?);
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::io_with_path(e, &addr))?;

        tracing::info!(
            %addr,
            base_id = %self.config.table.base_id,
            table_id = %self.config.table.table_id,
            data_ttl_secs = self.config.cache.data_ttl_secs,
            default_ttl_secs = self.config.cache.default_ttl_secs,
            "Almanac listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::io_with_path(e, &addr))?;

        tracing::info!("Almanac stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
