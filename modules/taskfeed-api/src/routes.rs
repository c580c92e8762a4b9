use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use taskfeed_store::FeedStore;

use crate::rest;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedStore>,
}

/// Build the application router.
///
/// `allowed_origin` pins CORS to a single origin; `None` falls back to a
/// permissive layer.
pub fn build_router(state: AppState, allowed_origin: Option<String>) -> Router {
    let cors = match allowed_origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/api/feed", get(rest::api_feed))
        .with_state(state)
        .layer(cors)
        // Logging layer: method + path + status + latency only (no query params)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
