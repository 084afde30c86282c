//! Ingest job request/response definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Document;

/// Request to start an ingest job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartIngestJobRequest {
    /// Documents to segment and hand off
    pub documents: Vec<Document>,
}

/// Response when starting an ingest job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartIngestJobResponse {
    /// ID of the created job
    pub job_id: Uuid,

    /// Whether the job was accepted
    pub accepted: bool,

    /// Number of documents queued
    pub documents_count: usize,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of an ingest job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestJobStatus {
    /// Job is queued but not started
    Pending,
    /// Job is currently running
    Running,
    /// Job finished; individual documents or chunks may still have failed
    Completed,
}

/// Response with job status information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestJobStatusResponse {
    pub job_id: Uuid,
    pub status: IngestJobStatus,
    pub total_documents: usize,
    pub processed_documents: usize,
    /// Documents rejected before segmentation (empty text, bad limits)
    pub rejected_documents: usize,
    pub chunks_produced: usize,
    pub chunks_handed_off: usize,
    pub chunks_failed: usize,
    pub chunks_dropped: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}
