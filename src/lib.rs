//! Segmenter Service Library
//!
//! Adaptive text segmentation for embedding ingestion. Long documents are
//! cut into chunks that follow paragraph, sentence, line and word
//! boundaries where they can, and that never exceed a hard character cap.

pub mod api;
pub mod error;
pub mod jobs;
pub mod output;
pub mod segmenter;
pub mod types;

pub use error::SegmentError;
pub use jobs::{IngestPipeline, IngestSummary};
pub use output::{ChunkHandoff, ChunkSink, Classifier};
pub use segmenter::{run, SegmentationEngine};
pub use types::{Chunk, ChunkSequence, Diagnostic, Document, SegmentationPolicy, SizeLimits};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::SegmentError;
    pub use crate::jobs::{IngestPipeline, IngestSummary};
    pub use crate::output::*;
    pub use crate::segmenter::*;
    pub use crate::types::*;
}

/// Default hard cap in characters (a conservative 4 chars/token under a
/// 1500-token budget)
pub const DEFAULT_HARD_MAX_CHARS: usize = 6000;

/// Default soft target in characters
pub const DEFAULT_SOFT_TARGET_CHARS: usize = 900;

/// Default per-paragraph ceiling in characters
pub const DEFAULT_PARAGRAPH_MAX_CHARS: usize = 1000;

/// Default noise floor for top-level fragments
pub const DEFAULT_MIN_PARAGRAPH_CHARS: usize = 50;

/// Default token guard (input limit of common embedding models)
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 8191;

/// Default characters per token for estimates
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;
