//! Token counting and shared helpers for the segmentation tiers.

use std::sync::Arc;

use anyhow::Result;

use crate::types::{ServiceConfig, TokenCounterKind};
use crate::DEFAULT_CHARS_PER_TOKEN;

/// Token counter trait for estimating the token size of a chunk.
pub trait TokenCounter: Send + Sync {
    /// Count (or estimate) the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "tokens"
    }
}

/// Conservative estimate: one token per `chars_per_token` characters, rounded up.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioCounter {
    chars_per_token: usize,
}

impl CharRatioCounter {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharRatioCounter {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl TokenCounter for CharRatioCounter {
    fn count_tokens(&self, text: &str) -> usize {
        char_len(text).div_ceil(self.chars_per_token)
    }

    fn name(&self) -> &'static str {
        "char_ratio"
    }
}

/// Exact counter backed by a tiktoken BPE encoding.
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenCounter {
    /// Load a named encoding. `cl100k_base` matches the OpenAI embedding models.
    pub fn with_encoding(encoding_name: &str) -> Result<Self> {
        let bpe = match encoding_name {
            "cl100k_base" => tiktoken_rs::cl100k_base()?,
            "p50k_base" => tiktoken_rs::p50k_base()?,
            "r50k_base" => tiktoken_rs::r50k_base()?,
            other => anyhow::bail!("unknown tiktoken encoding: {other}"),
        };
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &'static str {
        "tiktoken"
    }
}

/// Build the counter selected by `TOKEN_COUNTER`.
///
/// Fails only when a tiktoken encoding is requested and cannot be loaded.
pub fn counter_from_config(config: &ServiceConfig) -> Result<Arc<dyn TokenCounter>> {
    Ok(match config.token_counter {
        TokenCounterKind::CharRatio => Arc::new(CharRatioCounter::new(config.chars_per_token)),
        TokenCounterKind::Tiktoken => {
            Arc::new(TiktokenCounter::with_encoding(&config.tiktoken_encoding)?)
        }
    })
}

/// Length of `text` in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Greedy accumulate/flush shared by the word, line and sentence tiers.
///
/// `push` returns the buffered text once appending the next piece would
/// bring the buffer to `target` characters or more.
pub(crate) struct Accumulator<'s> {
    separator: &'s str,
    target: usize,
    buffer: String,
    buffer_chars: usize,
}

impl<'s> Accumulator<'s> {
    pub(crate) fn new(separator: &'s str, target: usize) -> Self {
        Self {
            separator,
            target,
            buffer: String::new(),
            buffer_chars: 0,
        }
    }

    /// Append `piece`, returning the previous buffer if it had to be flushed.
    pub(crate) fn push(&mut self, piece: &str) -> Option<String> {
        let piece_chars = char_len(piece);
        if self.buffer.is_empty() {
            self.buffer.push_str(piece);
            self.buffer_chars = piece_chars;
            return None;
        }

        let candidate = self.buffer_chars + char_len(self.separator) + piece_chars;
        if candidate >= self.target {
            let flushed = std::mem::replace(&mut self.buffer, piece.to_string());
            self.buffer_chars = piece_chars;
            Some(flushed)
        } else {
            self.buffer.push_str(self.separator);
            self.buffer.push_str(piece);
            self.buffer_chars = candidate;
            None
        }
    }

    /// Take the buffer if it holds anything.
    pub(crate) fn flush(&mut self) -> Option<String> {
        self.buffer_chars = 0;
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_ratio_rounds_up() {
        let counter = CharRatioCounter::new(4);
        assert_eq!(counter.count_tokens(""), 0);
        assert_eq!(counter.count_tokens("abcd"), 1);
        assert_eq!(counter.count_tokens("abcde"), 2);
    }

    #[test]
    fn test_char_ratio_never_divides_by_zero() {
        let counter = CharRatioCounter::new(0);
        assert_eq!(counter.count_tokens("abc"), 3);
    }

    #[test]
    fn test_tiktoken_counts() {
        let counter = TiktokenCounter::with_encoding("cl100k_base").unwrap();
        assert_eq!(counter.count_tokens("hello world"), 2);
    }

    #[test]
    fn test_counter_from_config() {
        let mut config = ServiceConfig::default();
        config.chars_per_token = 2;
        let counter = counter_from_config(&config).unwrap();
        assert_eq!(counter.name(), "char_ratio");
        assert_eq!(counter.count_tokens("abcde"), 3);

        config.token_counter = TokenCounterKind::Tiktoken;
        let counter = counter_from_config(&config).unwrap();
        assert_eq!(counter.name(), "tiktoken");
        assert_eq!(counter.count_tokens("hello world"), 2);

        config.tiktoken_encoding = "nope".to_string();
        assert!(counter_from_config(&config).is_err());
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(TiktokenCounter::with_encoding("nope").is_err());
    }

    #[test]
    fn test_accumulator_flushes_at_target() {
        let mut acc = Accumulator::new(" ", 10);
        assert_eq!(acc.push("abcd"), None);
        // "abcd efgh" is 9 chars, still under target
        assert_eq!(acc.push("efgh"), None);
        assert_eq!(acc.push("ij"), Some("abcd efgh".to_string()));
        assert_eq!(acc.flush(), Some("ij".to_string()));
        assert_eq!(acc.flush(), None);
    }
}
