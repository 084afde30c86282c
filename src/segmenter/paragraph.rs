//! Paragraph segmenter, the entry tier.

use regex::Regex;
use tracing::debug;

use super::base::char_len;
use super::sentence_packer::SentencePacker;
use crate::types::{Document, SegmentationPolicy, SizeLimits};

/// Splits a document on blank lines and routes long paragraphs to the
/// sentence packer.
pub struct ParagraphSegmenter {
    /// Two or more line breaks, allowing whitespace-only lines between them
    boundary_regex: Regex,
    sentences: SentencePacker,
}

impl ParagraphSegmenter {
    /// Create a new paragraph segmenter.
    pub fn new() -> Self {
        Self {
            boundary_regex: Regex::new(r"\r?\n(?:[ \t]*\r?\n)+")
                .expect("paragraph boundary pattern is valid"),
            sentences: SentencePacker::new(),
        }
    }

    /// Segment a document into candidate chunks, in reading order.
    ///
    /// Top-level fragments shorter than `policy.min_paragraph_chars` are
    /// dropped as noise. This can lose short headings or one-line
    /// definitions; set the floor to 0 to keep them. Candidates are not
    /// yet checked against the hard cap.
    pub fn segment(
        &self,
        document: &Document,
        limits: &SizeLimits,
        policy: &SegmentationPolicy,
    ) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut discarded = 0;

        for fragment in self.boundary_regex.split(&document.text) {
            let paragraph = fragment.trim();
            if paragraph.is_empty() {
                continue;
            }

            let chars = char_len(paragraph);
            if chars < policy.min_paragraph_chars {
                discarded += 1;
                continue;
            }

            if chars <= policy.paragraph_max_chars {
                chunks.push(paragraph.to_string());
            } else {
                debug!(
                    document_id = %document.id,
                    chars,
                    ceiling = policy.paragraph_max_chars,
                    "Paragraph over ceiling, packing by sentence"
                );
                chunks.extend(self.sentences.pack(
                    paragraph,
                    limits.soft_target_chars,
                    limits.hard_max_chars,
                ));
            }
        }

        if discarded > 0 {
            debug!(
                document_id = %document.id,
                discarded,
                min_chars = policy.min_paragraph_chars,
                "Discarded short fragments"
            );
        }

        chunks
    }
}

impl Default for ParagraphSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keep_all() -> SegmentationPolicy {
        SegmentationPolicy::default().keep_short_paragraphs()
    }

    #[test]
    fn test_splits_on_blank_lines() {
        let segmenter = ParagraphSegmenter::new();
        let doc = Document::new("t", "one\ntwo\n\nthree\n \t \n\n  four\r\n\r\nfive");
        let chunks = segmenter.segment(&doc, &SizeLimits::default(), &keep_all());
        assert_eq!(chunks, vec!["one\ntwo", "three", "four", "five"]);
    }

    #[test]
    fn test_noise_floor_drops_short_fragments() {
        let segmenter = ParagraphSegmenter::new();
        let body = "b".repeat(60);
        let doc = Document::new("t", format!("Heading\n\n{body}\n\n  tiny  "));
        let chunks = segmenter.segment(&doc, &SizeLimits::default(), &SegmentationPolicy::default());
        assert_eq!(chunks, vec![body.clone()]);

        let chunks = segmenter.segment(&doc, &SizeLimits::default(), &keep_all());
        assert_eq!(chunks, vec!["Heading".to_string(), body, "tiny".to_string()]);
    }

    #[test]
    fn test_paragraph_within_ceiling_is_kept_whole() {
        let segmenter = ParagraphSegmenter::new();
        let paragraph = "Short sentence. ".repeat(60);
        let doc = Document::new("t", paragraph.clone());
        let policy = keep_all().with_paragraph_max(2000);
        let chunks = segmenter.segment(&doc, &SizeLimits::default(), &policy);
        assert_eq!(chunks, vec![paragraph.trim().to_string()]);
    }

    #[test]
    fn test_long_paragraph_routed_to_sentences() {
        let segmenter = ParagraphSegmenter::new();
        let paragraph = "Short sentence. ".repeat(60);
        let doc = Document::new("t", paragraph);
        let limits = SizeLimits::new(500, 100).unwrap();
        let policy = keep_all().with_paragraph_max(200);
        let chunks = segmenter.segment(&doc, &limits, &policy);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() < 100));
    }

    #[test]
    fn test_long_lines_wait_for_validator() {
        let segmenter = ParagraphSegmenter::new();
        let long_line = "m".repeat(7000);
        let doc = Document::new("t", format!("header line\n{long_line}"));
        let chunks = segmenter.segment(&doc, &SizeLimits::default(), &keep_all());
        assert_eq!(chunks, vec!["header line".to_string(), long_line]);
    }
}
