pub mod api;
pub mod ui;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Every route with state attached
pub fn create_app(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .merge(ui::create_ui_router(max_upload_bytes))
        .merge(api::create_api_router(max_upload_bytes))
        .with_state(state)
}
