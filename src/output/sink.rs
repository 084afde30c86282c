//! The outbound seam: where chunks leave the engine.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::classify::ChunkTags;
use crate::types::Chunk;

/// What the embedding collaborator receives for each chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkHandoff {
    pub document_id: Uuid,
    pub source: String,
    pub ordinal: usize,
    pub content: String,
    pub token_estimate: usize,
    #[serde(default)]
    pub tags: ChunkTags,
}

impl ChunkHandoff {
    pub fn new(chunk: &Chunk, tags: ChunkTags) -> Self {
        Self {
            document_id: chunk.document_id,
            source: chunk.source.clone(),
            ordinal: chunk.ordinal,
            content: chunk.content.clone(),
            token_estimate: chunk.token_estimate,
            tags,
        }
    }
}

/// A collaborator that embeds and persists chunks, one call per chunk.
///
/// Only success or failure is observed; an `Err` is counted against the
/// chunk and never retried by the caller.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Hand one chunk to the collaborator.
    async fn accept(&self, handoff: &ChunkHandoff) -> Result<()>;
}

/// Sink that only logs, used when no embedding service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ChunkSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn accept(&self, handoff: &ChunkHandoff) -> Result<()> {
        debug!(
            document_id = %handoff.document_id,
            ordinal = handoff.ordinal,
            chars = handoff.content.chars().count(),
            token_estimate = handoff.token_estimate,
            "Chunk ready for embedding"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    #[test]
    fn test_handoff_copies_chunk_fields() {
        let doc = Document::new("manual.pdf", "ignored");
        let chunk = Chunk::new(&doc, 7, "Earth fault loop impedance.".to_string(), 7);
        let mut tags = ChunkTags::new();
        tags.insert("subject".to_string(), "testing".to_string());

        let handoff = ChunkHandoff::new(&chunk, tags);
        assert_eq!(handoff.ordinal, 7);
        assert_eq!(handoff.source, "manual.pdf");
        assert_eq!(handoff.document_id, doc.id);
        assert_eq!(handoff.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_log_sink_accepts() {
        let doc = Document::new("a", "b");
        let chunk = Chunk::new(&doc, 0, "text".to_string(), 1);
        assert!(LogSink.accept(&ChunkHandoff::new(&chunk, ChunkTags::new())).await.is_ok());
    }
}
