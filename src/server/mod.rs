//! HTTP transport: an axum router over a shared [`PdfExtractor`].
//!
//! The extractor is built once at start-up and handed to every request via
//! [`AppState`]; handlers never construct engines themselves.

mod handlers;

use crate::extract::PdfExtractor;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use handlers::{ErrorResponse, HealthResponse, ServiceInfo, SERVICE_NAME};

/// Default upload limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 20;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<PdfExtractor>,
}

impl AppState {
    pub fn new(extractor: PdfExtractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

/// Build the service router.
///
/// Request bodies above `max_upload_bytes` are rejected with 413.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/extract", post(handlers::extract_handler))
        .route("/extract/{tier}", post(handlers::extract_tier_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
