//! HTTP routes.
//!
//! | Route               | Response                                   |
//! |---------------------|--------------------------------------------|
//! | `GET /`             | every article, in source order             |
//! | `GET /article/{id}` | one article, or the 404 page               |
//! | `GET /health`       | JSON status                                |
//! | anything else       | the 404 page                               |
//!
//! Upstream failures never surface here: the record source degrades to an
//! empty list, so the list page renders with no articles.

use std::sync::Arc;

use almanac_client::RecordSource;
use almanac_core::Projector;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::views;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn RecordSource>,
    projector: Arc<Projector>,
    site_title: Arc<str>,
}

impl AppState {
    /// Build state from a record source, projector, and site title.
    pub fn new(
        source: Arc<dyn RecordSource>,
        projector: Projector,
        site_title: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            source,
            projector: Arc::new(projector),
            site_title: site_title.into(),
        }
    }
}

/// Errors a page handler can answer with.
#[derive(Debug)]
pub enum PageError {
    /// No such page or article.
    NotFound {
        /// Title for the page chrome.
        site_title: Arc<str>,
    },
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound { site_title } => (
                StatusCode::NOT_FOUND,
                Html(views::not_found_page(&site_title, current_year())),
            )
                .into_response(),
        }
    }
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: String,
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
}

/// Build the site router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/article/{id}", get(article_detail))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let records = state.source.records().await;
    let articles = state.projector.project_all(&records);
    tracing::debug!(count = articles.len(), "Rendering article list");
    Html(views::index_page(&state.site_title, &articles, current_year()))
}

async fn article_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let records = state.source.records().await;
    match state.projector.find_by_id(&records, &id) {
        Some(article) => Ok(Html(views::detail_page(
            &state.site_title,
            &article,
            current_year(),
        ))),
        None => {
            tracing::debug!(%id, "Article not found");
            Err(PageError::NotFound {
                site_title: state.site_title.clone(),
            })
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn not_found(State(state): State<AppState>) -> PageError {
    PageError::NotFound {
        site_title: state.site_title.clone(),
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}
