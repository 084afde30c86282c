//! Configuration types for segmentation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SegmentError;
use crate::output::KeywordRule;
use crate::{
    DEFAULT_CHARS_PER_TOKEN, DEFAULT_HARD_MAX_CHARS, DEFAULT_MAX_CHUNK_TOKENS,
    DEFAULT_MIN_PARAGRAPH_CHARS, DEFAULT_PARAGRAPH_MAX_CHARS, DEFAULT_SOFT_TARGET_CHARS,
};

/// Size bounds for chunks, in characters.
///
/// `hard_max_chars` is the ceiling no emitted chunk may exceed;
/// `soft_target_chars` is the size the packers aim for. Both must be
/// positive and the soft target strictly below the hard cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    /// Absolute ceiling for a chunk
    pub hard_max_chars: usize,

    /// Preferred chunk size
    pub soft_target_chars: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            hard_max_chars: DEFAULT_HARD_MAX_CHARS,
            soft_target_chars: DEFAULT_SOFT_TARGET_CHARS,
        }
    }
}

impl SizeLimits {
    /// Create validated limits.
    pub fn new(hard_max_chars: usize, soft_target_chars: usize) -> Result<Self, SegmentError> {
        let limits = Self {
            hard_max_chars,
            soft_target_chars,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Check `0 < soft_target_chars < hard_max_chars`.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.hard_max_chars == 0 || self.soft_target_chars == 0 {
            return Err(SegmentError::invalid_limits(
                "hard_max_chars and soft_target_chars must be greater than zero",
            ));
        }
        if self.soft_target_chars >= self.hard_max_chars {
            return Err(SegmentError::invalid_limits(format!(
                "soft_target_chars ({}) must be less than hard_max_chars ({})",
                self.soft_target_chars, self.hard_max_chars
            )));
        }
        Ok(())
    }
}

/// Tuning knobs for the paragraph tier and the driver's final guard.
///
/// None of these affect the hard-cap guarantee; the size validator
/// enforces that whatever they are set to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationPolicy {
    /// Paragraphs up to this length are emitted whole
    pub paragraph_max_chars: usize,

    /// Top-level fragments shorter than this (trimmed) are discarded; 0 keeps everything
    pub min_paragraph_chars: usize,

    /// Candidates whose token estimate exceeds this are dropped
    pub max_chunk_tokens: Option<usize>,
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self {
            paragraph_max_chars: DEFAULT_PARAGRAPH_MAX_CHARS,
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            max_chunk_tokens: Some(DEFAULT_MAX_CHUNK_TOKENS),
        }
    }
}

impl SegmentationPolicy {
    /// Keep every non-blank paragraph regardless of length.
    pub fn keep_short_paragraphs(mut self) -> Self {
        self.min_paragraph_chars = 0;
        self
    }

    /// Set the per-paragraph ceiling.
    pub fn with_paragraph_max(mut self, chars: usize) -> Self {
        self.paragraph_max_chars = chars;
        self
    }

    /// Set or clear the token guard.
    pub fn with_max_tokens(mut self, tokens: Option<usize>) -> Self {
        self.max_chunk_tokens = tokens;
        self
    }

    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.paragraph_max_chars == 0 {
            return Err(SegmentError::invalid_limits(
                "paragraph_max_chars must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Which `TokenCounter` the service builds its engines with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCounterKind {
    /// `ceil(chars / chars_per_token)`
    #[default]
    CharRatio,
    /// Exact BPE counts from `tiktoken-rs`
    Tiktoken,
}

impl FromStr for TokenCounterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "char_ratio" => Ok(Self::CharRatio),
            "tiktoken" => Ok(Self::Tiktoken),
            other => Err(format!("unknown token counter: {other}")),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Default chunk size limits
    pub limits: SizeLimits,

    /// Default segmentation policy
    pub policy: SegmentationPolicy,

    /// Characters per token used for token estimates
    pub chars_per_token: usize,

    /// Token counter used for estimates and the token guard
    pub token_counter: TokenCounterKind,

    /// Encoding loaded when `token_counter` is `Tiktoken`
    pub tiktoken_encoding: String,

    /// Keyword tagging rules; empty disables tagging
    pub keyword_rules: Vec<KeywordRule>,

    /// URL of the embedding service
    pub embedding_service_url: Option<String>,

    /// Request timeout for the embedding service
    pub embedding_timeout_secs: u64,

    /// How long completed jobs stay queryable
    pub job_retention_secs: u64,

    /// HTTP listen port
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            limits: SizeLimits::default(),
            policy: SegmentationPolicy::default(),
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            token_counter: TokenCounterKind::default(),
            tiktoken_encoding: "cl100k_base".to_string(),
            keyword_rules: Vec::new(),
            embedding_service_url: None,
            embedding_timeout_secs: 30,
            job_retention_secs: 3600,
            port: 3019,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to defaults. The resulting
    /// limits are not validated here; callers validate before use.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            limits: SizeLimits {
                hard_max_chars: env_or("HARD_MAX_CHARS", defaults.limits.hard_max_chars),
                soft_target_chars: env_or("SOFT_TARGET_CHARS", defaults.limits.soft_target_chars),
            },
            policy: SegmentationPolicy {
                paragraph_max_chars: env_or(
                    "PARAGRAPH_MAX_CHARS",
                    defaults.policy.paragraph_max_chars,
                ),
                min_paragraph_chars: env_or(
                    "MIN_PARAGRAPH_CHARS",
                    defaults.policy.min_paragraph_chars,
                ),
                max_chunk_tokens: match std::env::var("MAX_CHUNK_TOKENS").ok().as_deref() {
                    Some("none") | Some("off") => None,
                    Some(v) => v.parse().ok().or(defaults.policy.max_chunk_tokens),
                    None => defaults.policy.max_chunk_tokens,
                },
            },
            chars_per_token: env_or("CHARS_PER_TOKEN", defaults.chars_per_token),
            token_counter: env_or("TOKEN_COUNTER", defaults.token_counter),
            tiktoken_encoding: std::env::var("TIKTOKEN_ENCODING")
                .unwrap_or(defaults.tiktoken_encoding),
            keyword_rules: match std::env::var("KEYWORD_RULES") {
                Ok(raw) => parse_keyword_rules(&raw).unwrap_or_else(|e| {
                    warn!(error = %e, "KEYWORD_RULES is not valid JSON, tagging disabled");
                    Vec::new()
                }),
                Err(_) => defaults.keyword_rules,
            },
            embedding_service_url: std::env::var("EMBEDDING_SERVICE_URL").ok(),
            embedding_timeout_secs: env_or(
                "EMBEDDING_TIMEOUT_SECS",
                defaults.embedding_timeout_secs,
            ),
            job_retention_secs: env_or("JOB_RETENTION_SECS", defaults.job_retention_secs),
            port: env_or("PORT", defaults.port),
        }
    }

    /// `job_retention_secs` as a chrono duration. Values too large to
    /// represent mean jobs are effectively never evicted.
    pub fn job_retention(&self) -> chrono::Duration {
        chrono::Duration::from_std(std::time::Duration::from_secs(self.job_retention_secs))
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 1000))
    }
}

/// Parse a JSON array of `{ "tag", "value", "keywords": [...] }` objects.
pub fn parse_keyword_rules(raw: &str) -> serde_json::Result<Vec<KeywordRule>> {
    serde_json::from_str(raw)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_valid() {
        assert!(SizeLimits::default().validate().is_ok());
        assert!(SegmentationPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_soft_must_be_below_hard() {
        let err = SizeLimits::new(500, 1000).unwrap_err();
        assert!(matches!(err, SegmentError::InvalidLimits { .. }));
        assert!(SizeLimits::new(500, 500).is_err());
        assert!(SizeLimits::new(501, 500).is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(SizeLimits::new(0, 0).is_err());
        assert!(SizeLimits::new(100, 0).is_err());
        let policy = SegmentationPolicy::default().with_paragraph_max(0);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_limits_deserialize_with_defaults() {
        let limits: SizeLimits = serde_json::from_str(r#"{"soft_target_chars": 400}"#).unwrap();
        assert_eq!(limits.soft_target_chars, 400);
        assert_eq!(limits.hard_max_chars, DEFAULT_HARD_MAX_CHARS);
    }

    #[test]
    fn test_token_counter_kind_parses() {
        assert_eq!("tiktoken".parse::<TokenCounterKind>(), Ok(TokenCounterKind::Tiktoken));
        assert_eq!(" Char_Ratio ".parse::<TokenCounterKind>(), Ok(TokenCounterKind::CharRatio));
        assert!("bpe".parse::<TokenCounterKind>().is_err());
    }

    #[test]
    fn test_keyword_rules_parse_from_json() {
        let rules = parse_keyword_rules(
            r#"[{"tag":"subject","value":"safety","keywords":["isolation","PPE"]}]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].tag, "subject");
        assert_eq!(rules[0].keywords, vec!["isolation", "PPE"]);
        assert!(parse_keyword_rules("{not json").is_err());
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("SEGMENTER_TEST_UNSET_VARIABLE", 42usize), 42);
    }
}
