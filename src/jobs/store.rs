//! Job store for tracking ingest job status.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::pipeline::IngestSummary;
use crate::types::{IngestJobStatus, IngestJobStatusResponse};

/// In-memory job store for tracking ingest jobs.
pub struct JobStore {
    jobs: HashMap<Uuid, JobRecord>,
}

/// Internal record for tracking a job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub status: IngestJobStatus,
    pub total_documents: usize,
    pub processed_documents: usize,
    pub rejected_documents: usize,
    pub chunks_produced: usize,
    pub chunks_handed_off: usize,
    pub chunks_failed: usize,
    pub chunks_dropped: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new job record.
    pub fn new(job_id: Uuid, total_documents: usize) -> Self {
        Self {
            job_id,
            status: IngestJobStatus::Pending,
            total_documents,
            processed_documents: 0,
            rejected_documents: 0,
            chunks_produced: 0,
            chunks_handed_off: 0,
            chunks_failed: 0,
            chunks_dropped: 0,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the job as started.
    pub fn start(&mut self) {
        self.status = IngestJobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Fold one document's outcome into the totals.
    pub fn record_summary(&mut self, summary: &IngestSummary) {
        self.processed_documents += 1;
        self.chunks_produced += summary.chunks_produced;
        self.chunks_handed_off += summary.chunks_handed_off;
        self.chunks_failed += summary.chunks_failed;
        self.chunks_dropped += summary.chunks_dropped;
    }

    /// Count a document that could not be segmented.
    pub fn record_rejection(&mut self) {
        self.processed_documents += 1;
        self.rejected_documents += 1;
    }

    /// Mark the job as completed.
    pub fn complete(&mut self) {
        self.status = IngestJobStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Convert to response type.
    pub fn to_response(&self) -> IngestJobStatusResponse {
        IngestJobStatusResponse {
            job_id: self.job_id,
            status: self.status,
            total_documents: self.total_documents,
            processed_documents: self.processed_documents,
            rejected_documents: self.rejected_documents,
            chunks_produced: self.chunks_produced,
            chunks_handed_off: self.chunks_handed_off,
            chunks_failed: self.chunks_failed,
            chunks_dropped: self.chunks_dropped,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

impl JobStore {
    /// Create a new job store.
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
        }
    }

    /// Create a new job and return its ID.
    pub fn create_job(&mut self, total_documents: usize) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs.insert(job_id, JobRecord::new(job_id, total_documents));
        job_id
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: Uuid) -> Option<&JobRecord> {
        self.jobs.get(&job_id)
    }

    /// Apply `f` to the job if it exists.
    fn update(&mut self, job_id: Uuid, f: impl FnOnce(&mut JobRecord)) -> bool {
        match self.jobs.get_mut(&job_id) {
            Some(job) => {
                f(job);
                true
            }
            None => false,
        }
    }

    pub fn start_job(&mut self, job_id: Uuid) -> bool {
        self.update(job_id, JobRecord::start)
    }

    pub fn record_summary(&mut self, job_id: Uuid, summary: &IngestSummary) -> bool {
        self.update(job_id, |job| job.record_summary(summary))
    }

    pub fn record_rejection(&mut self, job_id: Uuid) -> bool {
        self.update(job_id, JobRecord::record_rejection)
    }

    pub fn complete_job(&mut self, job_id: Uuid) -> bool {
        self.update(job_id, JobRecord::complete)
    }

    /// Get job status as response.
    pub fn get_job_status(&self, job_id: Uuid) -> Option<IngestJobStatusResponse> {
        self.jobs.get(&job_id).map(JobRecord::to_response)
    }

    /// Drop completed jobs that finished more than `retention` ago.
    /// Pending and running jobs are always kept. Returns how many were removed.
    pub fn cleanup_old_jobs(&mut self, retention: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
            return 0;
        };
        let before = self.jobs.len();
        self.jobs.retain(|_, job| match job.completed_at {
            Some(finished) if job.status == IngestJobStatus::Completed => finished > cutoff,
            _ => true,
        });
        before - self.jobs.len()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
