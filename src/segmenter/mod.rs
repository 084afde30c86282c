//! The segmentation tiers and the driver that chains them.

mod base;
mod engine;
mod hard_split;
mod line_packer;
mod paragraph;
mod sentence_packer;
mod validator;
mod word_packer;

pub use base::{counter_from_config, CharRatioCounter, TiktokenCounter, TokenCounter};
pub use engine::{run, SegmentationEngine};
pub use hard_split::split_at_boundary;
pub use line_packer::pack_lines;
pub use paragraph::ParagraphSegmenter;
pub use sentence_packer::SentencePacker;
pub use validator::enforce;
pub use word_packer::pack_words;
