use std::sync::Arc;

use crate::pipeline::CvPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the completion client; cheap to share between requests.
    pub pipeline: Arc<CvPipeline>,
}
