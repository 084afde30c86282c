//! Error types for the segmentation engine.

use thiserror::Error;

/// Errors that stop a document from being segmented at all.
///
/// Everything that happens after segmentation starts (oversize drops,
/// collaborator failures) is recovered per chunk and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// The document text is empty once surrounding whitespace is removed.
    #[error("document text is empty")]
    EmptyInput,

    /// The caller supplied limits that violate `0 < soft < hard`.
    #[error("invalid size limits: {reason}")]
    InvalidLimits { reason: String },
}

impl SegmentError {
    pub(crate) fn invalid_limits(reason: impl Into<String>) -> Self {
        Self::InvalidLimits {
            reason: reason.into(),
        }
    }
}
