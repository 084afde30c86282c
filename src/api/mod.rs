//! HTTP surface of the segmentation service.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use handlers::AppState;

/// Build the service routes over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Synchronous segmentation
        .route("/segment", post(handlers::segment_document))
        // Ingest jobs
        .route("/ingest/jobs", post(handlers::start_ingest_job))
        .route("/ingest/jobs/:job_id", get(handlers::get_job_status))
        .with_state(state)
}
