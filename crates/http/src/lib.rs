//! HTTP frontend for carsearch.
//!
//! Serves the search page rendered on the server: each request with a query
//! runs one [`SearchController`] cycle against the configured backend and
//! returns the resulting page.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use carsearch_core::render::{page_document, SearchForm};
use carsearch_core::{
    HttpBackend, MemoryPage, PageHandles, PageSnapshot, SearchController, SearchMethod, StalePolicy,
};

/// Shared state for all handlers.
pub struct AppContext {
    pub backend: HttpBackend,
    pub stale_policy: StalePolicy,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    method: Option<String>,
    q: Option<String>,
}

/// Build the frontend router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/health", get(api_health))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// `GET /?method=<m>&q=<query>`
///
/// Without `q` the idle page is returned.
pub async fn search_page(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<PageQuery>,
) -> Html<String> {
    let method = params.method.unwrap_or_else(|| SearchMethod::Sequential.as_str().to_string());

    let Some(query) = params.q else {
        let form = SearchForm { method, query: String::new() };
        return Html(page_document(&PageSnapshot::default(), &form));
    };

    debug!(method = method.as_str(), query = query.as_str(), "Rendering search page");
    let page = Arc::new(MemoryPage::new());
    let controller = SearchController::with_policy(
        ctx.backend.clone(),
        PageHandles::memory(&page),
        ctx.stale_policy,
    );
    controller.perform_search(&method, &query).await;

    let form = SearchForm { method, query };
    Html(page_document(&page.snapshot(), &form))
}

pub async fn api_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
