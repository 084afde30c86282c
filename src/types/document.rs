//! Input document type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document to be segmented.
///
/// This is the input unit received from callers. The engine only ever
/// borrows it; chunks copy the text they need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for this document
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Provenance label (file name, URL, topic)
    pub source: String,

    /// The raw text to segment
    pub text: String,
}

impl Document {
    /// Create a document with a fresh identifier.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            text: text.into(),
        }
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the text holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
