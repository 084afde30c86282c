//! HTTP request handlers for the segmentation service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SegmentError;
use crate::jobs::{IngestPipeline, JobProcessor, JobStore};
use crate::output::{ChunkSink, Classifier};
use crate::segmenter::{counter_from_config, SegmentationEngine, TokenCounter};
use crate::types::{
    ChunkSequence, Document, SegmentationPolicy, ServiceConfig, SizeLimits,
    StartIngestJobRequest, StartIngestJobResponse,
};

/// Application state shared across handlers.
pub struct AppState {
    pub engine: Arc<SegmentationEngine>,
    pub pipeline: Arc<IngestPipeline>,
    pub job_store: Arc<RwLock<JobStore>>,
    pub counter: Arc<dyn TokenCounter>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// Fails on invalid default limits or a token encoding that cannot be loaded.
    pub fn new(
        config: ServiceConfig,
        classifier: Arc<dyn Classifier>,
        sink: Arc<dyn ChunkSink>,
    ) -> anyhow::Result<Self> {
        let counter = counter_from_config(&config)?;
        let engine = Arc::new(build_engine(
            &counter,
            config.limits,
            config.policy.clone(),
        )?);
        let pipeline = Arc::new(IngestPipeline::new(engine.clone(), classifier, sink));
        Ok(Self {
            engine,
            pipeline,
            job_store: Arc::new(RwLock::new(JobStore::new())),
            counter,
            config,
        })
    }
}

fn build_engine(
    counter: &Arc<dyn TokenCounter>,
    limits: SizeLimits,
    policy: SegmentationPolicy,
) -> Result<SegmentationEngine, SegmentError> {
    Ok(SegmentationEngine::new(limits, policy)?.with_counter(counter.clone()))
}

/// Segmentation errors surfaced to HTTP callers.
#[derive(Debug)]
pub struct ApiError(SegmentError);

impl From<SegmentError> for ApiError {
    fn from(e: SegmentError) -> Self {
        Self(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Request body for synchronous segmentation.
#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    document: Document,
    #[serde(default)]
    limits: Option<SizeLimits>,
    #[serde(default)]
    policy: Option<SegmentationPolicy>,
}

/// Segment one document and return its chunks without handing them off.
pub async fn segment_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SegmentRequest>,
) -> Result<Json<ChunkSequence>, ApiError> {
    let sequence = match (request.limits, request.policy) {
        (None, None) => state.engine.run(&request.document)?,
        (limits, policy) => {
            let engine = build_engine(
                &state.counter,
                limits.unwrap_or(state.config.limits),
                policy.unwrap_or_else(|| state.config.policy.clone()),
            )?;
            engine.run(&request.document)?
        }
    };
    Ok(Json(sequence))
}

/// Start an ingest job.
pub async fn start_ingest_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartIngestJobRequest>,
) -> Json<StartIngestJobResponse> {
    let documents_count = request.documents.len();

    if documents_count == 0 {
        return Json(StartIngestJobResponse {
            job_id: Uuid::nil(),
            accepted: false,
            documents_count: 0,
            message: Some("No documents provided".to_string()),
        });
    }

    let job_id = {
        let mut store = state.job_store.write().await;
        let evicted = store.cleanup_old_jobs(state.config.job_retention());
        if evicted > 0 {
            debug!(evicted, "Evicted finished ingest jobs");
        }
        store.create_job(documents_count)
    };
    info!(job_id = %job_id, documents = documents_count, "Received ingest job request");

    let processor = JobProcessor::new(state.pipeline.clone());
    let job_store = state.job_store.clone();
    tokio::spawn(async move {
        processor.process_job(job_id, request, job_store).await;
    });

    Json(StartIngestJobResponse {
        job_id,
        accepted: true,
        documents_count,
        message: None,
    })
}

/// Get job status.
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = state.job_store.read().await;

    match store.get_job_status(job_id) {
        Some(status) => Ok(Json(status)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
