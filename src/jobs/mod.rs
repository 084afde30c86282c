//! Ingest pipeline and job processing.

mod pipeline;
mod processor;
mod store;

pub use pipeline::{IngestPipeline, IngestSummary};
pub use processor::JobProcessor;
pub use store::{JobRecord, JobStore};
