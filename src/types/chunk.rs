//! Chunk type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Document;

/// A bounded-size span of a document's text.
///
/// Chunks are the unit handed to the embedding collaborator. Every chunk
/// produced by the engine is non-blank and no longer than the hard cap it
/// was segmented with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: Uuid,

    /// ID of the document this chunk was cut from
    pub document_id: Uuid,

    /// Provenance label copied from the document
    pub source: String,

    /// Position of this chunk in reading order (0-indexed, no gaps)
    pub ordinal: usize,

    /// The chunk text
    pub content: String,

    /// Length of `content` in characters
    pub char_count: usize,

    /// Estimated token count of `content`
    pub token_estimate: usize,

    /// When this chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a chunk for the given document.
    pub fn new(document: &Document, ordinal: usize, content: String, token_estimate: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document.id,
            source: document.source.clone(),
            ordinal,
            char_count: content.chars().count(),
            content,
            token_estimate,
            created_at: Utc::now(),
        }
    }

    /// Get the length of the chunk content in characters.
    pub fn len(&self) -> usize {
        self.char_count
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A candidate chunk the driver refused to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A candidate was still over the hard cap after the size validator ran.
    /// Unreachable unless a tier is broken.
    OversizeAfterValidation {
        position: usize,
        char_count: usize,
        hard_max_chars: usize,
    },

    /// A candidate's token estimate exceeded the configured token guard.
    TokenEstimateExceeded {
        position: usize,
        token_estimate: usize,
        max_chunk_tokens: usize,
    },
}

/// The ordered chunks produced for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSequence {
    /// ID of the segmented document
    pub document_id: Uuid,

    /// Provenance label of the segmented document
    pub source: String,

    /// Chunks in reading order
    pub chunks: Vec<Chunk>,

    /// Candidates dropped by the final guard
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ChunkSequence {
    /// Create an empty sequence for the given document.
    pub fn new(document: &Document) -> Self {
        Self {
            document_id: document.id,
            source: document.source.clone(),
            chunks: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// Borrow the chunk texts in order.
    pub fn texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.content.as_str()).collect()
    }

    /// Number of candidates dropped by the final guard.
    pub fn dropped(&self) -> usize {
        self.diagnostics.len()
    }
}

impl IntoIterator for ChunkSequence {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
