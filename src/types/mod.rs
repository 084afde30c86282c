//! Core types for the segmentation service.

mod chunk;
mod config;
mod document;
mod job;

pub use chunk::{Chunk, ChunkSequence, Diagnostic};
pub use config::{
    parse_keyword_rules, SegmentationPolicy, ServiceConfig, SizeLimits, TokenCounterKind,
};
pub use document::Document;
pub use job::{
    IngestJobStatus, IngestJobStatusResponse, StartIngestJobRequest, StartIngestJobResponse,
};
