//! Segmentation driver.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::base::{char_len, CharRatioCounter, TokenCounter};
use super::paragraph::ParagraphSegmenter;
use super::validator::enforce;
use crate::error::SegmentError;
use crate::types::{Chunk, ChunkSequence, Diagnostic, Document, SegmentationPolicy, SizeLimits};

/// Runs the tier waterfall for one document at a time.
///
/// paragraph -> sentence -> line -> word -> hard boundary, then the size
/// validator over the flat candidate list. Every tier only calls tiers
/// below it, so segmentation always terminates. The engine keeps no
/// per-document state and can be shared across tasks.
pub struct SegmentationEngine {
    limits: SizeLimits,
    policy: SegmentationPolicy,
    paragraphs: ParagraphSegmenter,
    counter: Arc<dyn TokenCounter>,
}

impl SegmentationEngine {
    /// Create an engine, rejecting invalid limits up front.
    pub fn new(limits: SizeLimits, policy: SegmentationPolicy) -> Result<Self, SegmentError> {
        limits.validate()?;
        policy.validate()?;
        Ok(Self {
            limits,
            policy,
            paragraphs: ParagraphSegmenter::new(),
            counter: Arc::new(CharRatioCounter::default()),
        })
    }

    /// Use a different token counter for estimates and the token guard.
    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn limits(&self) -> &SizeLimits {
        &self.limits
    }

    pub fn policy(&self) -> &SegmentationPolicy {
        &self.policy
    }

    /// Segment `document` into an ordered chunk sequence.
    ///
    /// Every returned chunk is non-blank, at most `hard_max_chars` long,
    /// and numbered `0..n` in reading order. Candidates refused by the
    /// final guard are recorded in `diagnostics` instead.
    pub fn run(&self, document: &Document) -> Result<ChunkSequence, SegmentError> {
        if document.is_blank() {
            return Err(SegmentError::EmptyInput);
        }

        let hard_max = self.limits.hard_max_chars;
        let candidates = self.paragraphs.segment(document, &self.limits, &self.policy);
        let candidates = enforce(candidates, hard_max);
        debug!(
            document_id = %document.id,
            candidates = candidates.len(),
            "Validated candidate chunks"
        );

        let mut sequence = ChunkSequence::new(document);

        for (position, text) in candidates.into_iter().enumerate() {
            let char_count = char_len(&text);
            if char_count > hard_max {
                error!(
                    document_id = %document.id,
                    position,
                    char_count,
                    hard_max,
                    "Chunk over hard cap after validation, dropping"
                );
                sequence.diagnostics.push(Diagnostic::OversizeAfterValidation {
                    position,
                    char_count,
                    hard_max_chars: hard_max,
                });
                continue;
            }

            let token_estimate = self.counter.count_tokens(&text);
            if let Some(max_tokens) = self.policy.max_chunk_tokens {
                if token_estimate > max_tokens {
                    warn!(
                        document_id = %document.id,
                        position,
                        token_estimate,
                        max_tokens,
                        counter = self.counter.name(),
                        "Chunk token estimate over limit, dropping"
                    );
                    sequence.diagnostics.push(Diagnostic::TokenEstimateExceeded {
                        position,
                        token_estimate,
                        max_chunk_tokens: max_tokens,
                    });
                    continue;
                }
            }

            let ordinal = sequence.chunks.len();
            sequence
                .chunks
                .push(Chunk::new(document, ordinal, text, token_estimate));
        }

        info!(
            document_id = %document.id,
            source = %document.source,
            chars = document.char_count(),
            chunks = sequence.len(),
            dropped = sequence.dropped(),
            "Segmented document"
        );

        Ok(sequence)
    }
}

/// Segment `document` with the given limits and the default policy.
pub fn run(document: &Document, limits: &SizeLimits) -> Result<ChunkSequence, SegmentError> {
    SegmentationEngine::new(*limits, SegmentationPolicy::default())?.run(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine(hard: usize, soft: usize) -> SegmentationEngine {
        SegmentationEngine::new(
            SizeLimits::new(hard, soft).unwrap(),
            SegmentationPolicy::default(),
        )
        .unwrap()
    }

    fn paragraph_of(len: usize, word: &str) -> String {
        let mut text = String::new();
        while text.len() < len {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(word);
        }
        text.truncate(len);
        text.trim_end().to_string()
    }

    #[test]
    fn test_two_short_paragraphs() {
        let first = paragraph_of(80, "circuit");
        let second = paragraph_of(120, "breaker");
        let doc = Document::new("notes", format!("{first}\n\n{second}\n"));

        let sequence = engine(6000, 900).run(&doc).unwrap();
        assert_eq!(sequence.texts(), vec![first.as_str(), second.as_str()]);
        let ordinals: Vec<usize> = sequence.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert!(sequence.diagnostics.is_empty());
    }

    #[test]
    fn test_giant_token_document() {
        let giant = "k".repeat(20_000);
        let doc = Document::new("blob", giant.clone());

        let sequence = engine(6000, 900).run(&doc).unwrap();
        let lens: Vec<usize> = sequence.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![6000, 6000, 6000, 2000]);
        assert_eq!(sequence.texts().concat(), giant);
    }

    #[test]
    fn test_blank_documents_rejected() {
        let e = engine(6000, 900);
        assert_eq!(e.run(&Document::new("a", "")).unwrap_err(), SegmentError::EmptyInput);
        assert_eq!(
            e.run(&Document::new("a", "   \n\n \t\n  ")).unwrap_err(),
            SegmentError::EmptyInput
        );
    }

    #[test]
    fn test_invalid_limits_rejected_before_processing() {
        let limits = SizeLimits {
            hard_max_chars: 500,
            soft_target_chars: 1000,
        };
        let err = run(&Document::new("a", ""), &limits).unwrap_err();
        assert!(matches!(err, SegmentError::InvalidLimits { .. }));
    }

    #[test]
    fn test_validator_catches_paragraph_over_hard_cap() {
        let word = "v".repeat(7000);
        let doc = Document::new("v", word.clone());
        let policy = SegmentationPolicy::default().with_paragraph_max(8000);
        let engine = SegmentationEngine::new(SizeLimits::default(), policy).unwrap();

        let candidates = engine
            .paragraphs
            .segment(&doc, engine.limits(), engine.policy());
        assert_eq!(candidates, vec![word.clone()]);

        let sequence = engine.run(&doc).unwrap();
        let lens: Vec<usize> = sequence.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![6000, 1000]);
        assert_eq!(sequence.texts().concat(), word);
    }

    #[test]
    fn test_validator_catches_oversize_line() {
        let line = "n".repeat(7000);
        let doc = Document::new("table", format!("column header row\n{line}"));

        let sequence = engine(6000, 900).run(&doc).unwrap();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.chunks[0].content, "column header row");
        assert!(sequence.iter().all(|c| c.len() <= 6000));
    }

    #[test]
    fn test_token_estimate_attached() {
        let text = paragraph_of(100, "estimate");
        let sequence = engine(6000, 900).run(&Document::new("t", text.clone())).unwrap();
        assert_eq!(sequence.chunks[0].token_estimate, text.len().div_ceil(4));
    }

    struct OneTokenPerChar;

    impl TokenCounter for OneTokenPerChar {
        fn count_tokens(&self, text: &str) -> usize {
            text.chars().count()
        }
    }

    #[test]
    fn test_token_guard_drops_and_renumbers() {
        let small = paragraph_of(60, "fits");
        let large = paragraph_of(150, "toolarge");
        let doc = Document::new("t", format!("{small}\n\n{large}\n\n{small}"));
        let policy = SegmentationPolicy::default().with_max_tokens(Some(100));
        let engine = SegmentationEngine::new(SizeLimits::default(), policy)
            .unwrap()
            .with_counter(Arc::new(OneTokenPerChar));

        let sequence = engine.run(&doc).unwrap();
        assert_eq!(sequence.len(), 2);
        let ordinals: Vec<usize> = sequence.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert_eq!(
            sequence.diagnostics,
            vec![Diagnostic::TokenEstimateExceeded {
                position: 1,
                token_estimate: large.len(),
                max_chunk_tokens: 100,
            }]
        );
    }

    #[test]
    fn test_only_noise_yields_empty_sequence() {
        let sequence = engine(6000, 900)
            .run(&Document::new("t", "Title\n\nSubtitle"))
            .unwrap();
        assert!(sequence.is_empty());
    }

    mod properties {
        use super::super::*;
        use crate::segmenter::validator::enforce;
        use proptest::prelude::*;

        fn limits() -> impl Strategy<Value = SizeLimits> {
            (1usize..60, 1usize..200).prop_map(|(soft, extra)| SizeLimits {
                hard_max_chars: soft + extra,
                soft_target_chars: soft,
            })
        }

        fn text() -> impl Strategy<Value = String> {
            "[a-zA-Zé0-9 .!?\n\t]{0,600}"
        }

        proptest! {
            #[test]
            fn prop_chunks_within_hard_cap(text in text(), limits in limits(), ceiling in 1usize..400) {
                let policy = SegmentationPolicy::default()
                    .keep_short_paragraphs()
                    .with_paragraph_max(ceiling);
                let engine = SegmentationEngine::new(limits, policy).unwrap();
                let doc = Document::new("prop", text);
                if let Ok(sequence) = engine.run(&doc) {
                    for chunk in &sequence {
                        let chars = chunk.content.chars().count();
                        prop_assert!(chars >= 1);
                        prop_assert!(chars <= limits.hard_max_chars);
                        prop_assert!(!chunk.content.trim().is_empty());
                    }
                }
            }

            #[test]
            fn prop_ordinals_contiguous(text in text(), limits in limits()) {
                let policy = SegmentationPolicy::default().keep_short_paragraphs();
                let engine = SegmentationEngine::new(limits, policy).unwrap();
                if let Ok(sequence) = engine.run(&Document::new("prop", text)) {
                    let ordinals: Vec<usize> = sequence.iter().map(|c| c.ordinal).collect();
                    let expected: Vec<usize> = (0..sequence.len()).collect();
                    prop_assert_eq!(ordinals, expected);
                }
            }

            #[test]
            fn prop_whitespace_only_rejected(text in "[ \t\r\n]{0,80}", limits in limits()) {
                let result = run(&Document::new("prop", text), &limits);
                prop_assert_eq!(result.unwrap_err(), SegmentError::EmptyInput);
            }

            #[test]
            fn prop_enforce_idempotent(
                chunks in proptest::collection::vec("[a-z \n]{0,120}", 0..8),
                hard in 1usize..50,
            ) {
                let once = enforce(chunks, hard);
                let twice = enforce(once.clone(), hard);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn prop_giant_token_reconstructs(hard in 10usize..400) {
                let token = "t".repeat(hard * 3);
                let limits = SizeLimits { hard_max_chars: hard, soft_target_chars: hard - 1 };
                let policy = SegmentationPolicy::default().keep_short_paragraphs();
                let engine = SegmentationEngine::new(limits, policy).unwrap();
                let sequence = engine.run(&Document::new("prop", token.clone())).unwrap();
                prop_assert!(sequence.iter().all(|c| c.len() <= hard));
                prop_assert_eq!(sequence.texts().concat(), token);
            }
        }
    }
}
