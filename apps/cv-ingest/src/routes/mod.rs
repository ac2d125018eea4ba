pub mod extract;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Slack on top of the base64-inflated upload ceiling for the JSON envelope.
const ENVELOPE_OVERHEAD_BYTES: usize = 64 * 1024;

/// Largest request body accepted: base64 grows the payload by 4/3.
pub fn request_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.div_ceil(3) * 4 + ENVELOPE_OVERHEAD_BYTES
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = request_body_limit(state.pipeline.settings().max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv/extract", post(extract::handle_extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
