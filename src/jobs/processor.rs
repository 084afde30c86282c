//! Job processor for background ingestion.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::pipeline::IngestPipeline;
use super::store::JobStore;
use crate::types::StartIngestJobRequest;

/// Runs ingest jobs, one document at a time.
pub struct JobProcessor {
    pipeline: Arc<IngestPipeline>,
}

impl JobProcessor {
    /// Create a new job processor.
    pub fn new(pipeline: Arc<IngestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Process an ingest job, recording progress in `job_store`.
    ///
    /// A document that cannot be segmented is counted as rejected and the
    /// job moves on to the next one.
    pub async fn process_job(
        &self,
        job_id: Uuid,
        request: StartIngestJobRequest,
        job_store: Arc<RwLock<JobStore>>,
    ) {
        info!(job_id = %job_id, documents = request.documents.len(), "Starting job processing");

        job_store.write().await.start_job(job_id);

        for document in &request.documents {
            match self.pipeline.ingest(document).await {
                Ok(summary) => {
                    job_store.write().await.record_summary(job_id, &summary);
                }
                Err(e) => {
                    warn!(
                        job_id = %job_id,
                        document_id = %document.id,
                        source = %document.source,
                        error = %e,
                        "Failed to segment document, continuing with others"
                    );
                    job_store.write().await.record_rejection(job_id);
                }
            }
        }

        let mut store = job_store.write().await;
        store.complete_job(job_id);
        if let Some(job) = store.get_job(job_id) {
            info!(
                job_id = %job_id,
                processed = job.processed_documents,
                rejected = job.rejected_documents,
                produced = job.chunks_produced,
                handed_off = job.chunks_handed_off,
                "Job processing complete"
            );
        }
    }
}
