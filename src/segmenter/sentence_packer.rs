//! Sentence-level packer.

use regex::Regex;
use tracing::debug;

use super::base::{char_len, Accumulator};
use super::line_packer::pack_lines;
use super::validator::enforce;
use super::word_packer::pack_words;

/// Packs sentence-terminated spans into chunks under a soft target.
///
/// Falls back to line packing (multi-line text) or word packing when the
/// text has no `.`, `!` or `?` terminators.
pub struct SentencePacker {
    /// A run of non-terminators, one or more terminators, trailing whitespace
    sentence_regex: Regex,
}

impl SentencePacker {
    /// Create a new sentence packer.
    pub fn new() -> Self {
        Self {
            sentence_regex: Regex::new(r"[^.!?]+[.!?]+\s*").expect("sentence pattern is valid"),
        }
    }

    /// Split text into trimmed sentence spans.
    ///
    /// Returns nothing if no terminated sentence is found. Otherwise text
    /// the pattern skips (leading terminators, a trailing unterminated
    /// clause) stays attached to its neighbouring span.
    pub fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut spans = Vec::new();
        let mut start = 0;

        for m in self.sentence_regex.find_iter(text) {
            spans.push(text[start..m.end()].trim());
            start = m.end();
        }

        if !spans.is_empty() {
            spans.push(text[start..].trim());
        }

        spans.retain(|s| !s.is_empty());
        spans
    }

    /// Pack `text` into chunks of whole sentences.
    ///
    /// A flush happens when appending the next sentence would bring the
    /// chunk to `target` characters. Any resulting chunk over `hard_max`
    /// (a single run-on sentence) is cut by the hard boundary splitter.
    pub fn pack(&self, text: &str, target: usize, hard_max: usize) -> Vec<String> {
        let sentences = self.split_sentences(text);

        if sentences.is_empty() {
            if text.contains('\n') {
                debug!(chars = char_len(text), "No sentence terminators, packing by line");
                return pack_lines(text, target);
            }
            debug!(chars = char_len(text), "No sentence terminators, packing by word");
            return pack_words(text, target, hard_max);
        }

        let mut chunks = Vec::new();
        let mut acc = Accumulator::new(" ", target);
        for sentence in sentences {
            chunks.extend(acc.push(sentence));
        }
        chunks.extend(acc.flush());

        enforce(chunks, hard_max)
    }
}

impl Default for SentencePacker {
    fn default() -> Self {
        Self::new()
    }
}
