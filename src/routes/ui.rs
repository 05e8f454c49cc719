use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::page;
use crate::state::AppState;
use std::sync::Arc;

/// Create the browser page router
pub fn create_ui_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page::index))
        .route("/process", post(page::process))
        .route("/reset", post(page::reset))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
