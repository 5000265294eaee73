use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::json::DEFAULT_MAX_DEPTH;
use service::DocumentStore;

pub mod documents;

/// Shared handler state. The store is injected so any backend can sit behind the routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub max_json_depth: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, max_json_depth: DEFAULT_MAX_DEPTH }
    }

    pub fn with_max_json_depth(mut self, depth: usize) -> Self {
        self.max_json_depth = depth;
        self
    }
}

pub const LIVENESS_TEXT: &str = "roadvision JSON server is running.";

pub async fn home() -> &'static str {
    LIVENESS_TEXT
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
///
/// | route                      | handler                 |
/// |----------------------------|-------------------------|
/// | `GET /`                    | [`home`]                |
/// | `GET /health`              | [`health`]              |
/// | `POST /upload`             | [`documents::upload`]   |
/// | `GET /download/:filename`  | [`documents::download`] |
/// | `GET /list`                | [`documents::list`]     |
pub fn build_router(state: AppState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/upload", post(documents::upload))
        .route("/download/:filename", get(documents::download))
        .route("/list", get(documents::list))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
