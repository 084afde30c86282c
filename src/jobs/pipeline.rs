//! Segment-then-hand-off pipeline for a single document.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SegmentError;
use crate::output::{ChunkHandoff, ChunkSink, Classifier};
use crate::segmenter::SegmentationEngine;
use crate::types::Document;

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub document_id: Uuid,
    pub source: String,
    /// Chunks the engine emitted
    pub chunks_produced: usize,
    /// Chunks the sink accepted
    pub chunks_handed_off: usize,
    /// Chunks the sink rejected
    pub chunks_failed: usize,
    /// Candidates the engine's final guard refused
    pub chunks_dropped: usize,
}

impl IngestSummary {
    /// Whether every produced chunk reached the sink.
    pub fn is_complete(&self) -> bool {
        self.chunks_failed == 0 && self.chunks_dropped == 0
    }
}

/// Segments documents and hands their chunks to a sink, strictly in order.
///
/// Chunk `i + 1` is not submitted until the sink has answered for chunk
/// `i`. Failures are logged and counted; nothing is retried or rolled back.
pub struct IngestPipeline {
    engine: Arc<SegmentationEngine>,
    classifier: Arc<dyn Classifier>,
    sink: Arc<dyn ChunkSink>,
}

impl IngestPipeline {
    pub fn new(
        engine: Arc<SegmentationEngine>,
        classifier: Arc<dyn Classifier>,
        sink: Arc<dyn ChunkSink>,
    ) -> Self {
        Self {
            engine,
            classifier,
            sink,
        }
    }

    /// Segment `document` and hand off each chunk.
    ///
    /// Only segmentation errors are returned; sink failures show up in the
    /// summary.
    pub async fn ingest(&self, document: &Document) -> Result<IngestSummary, SegmentError> {
        let sequence = self.engine.run(document)?;

        let mut summary = IngestSummary {
            document_id: document.id,
            source: document.source.clone(),
            chunks_produced: sequence.len(),
            chunks_handed_off: 0,
            chunks_failed: 0,
            chunks_dropped: sequence.dropped(),
        };

        for chunk in &sequence {
            let tags = self.classifier.classify(&chunk.content);
            let handoff = ChunkHandoff::new(chunk, tags);

            match self.sink.accept(&handoff).await {
                Ok(()) => summary.chunks_handed_off += 1,
                Err(e) => {
                    summary.chunks_failed += 1;
                    warn!(
                        document_id = %document.id,
                        ordinal = chunk.ordinal,
                        sink = self.sink.name(),
                        error = %e,
                        "Chunk hand-off failed, continuing with next chunk"
                    );
                }
            }
        }

        info!(
            document_id = %document.id,
            source = %document.source,
            produced = summary.chunks_produced,
            handed_off = summary.chunks_handed_off,
            failed = summary.chunks_failed,
            dropped = summary.chunks_dropped,
            "Document ingested"
        );

        Ok(summary)
    }
}
