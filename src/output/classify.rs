//! Lightweight chunk tagging ahead of hand-off.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Tag name to tag value, e.g. `"subject" -> "electrical"`.
pub type ChunkTags = BTreeMap<String, String>;

/// Derives tags from chunk text. Called once per chunk, after
/// segmentation and before the sink.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> ChunkTags;
}

/// Attaches no tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl Classifier for NoopClassifier {
    fn classify(&self, _text: &str) -> ChunkTags {
        ChunkTags::new()
    }
}

/// One keyword rule: if any keyword occurs in the text, `tag` is set to `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub tag: String,
    pub value: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(tag: &str, value: &str, keywords: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            value: value.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Case-insensitive substring matching over a caller-supplied rule list.
///
/// Rules are checked in order and the first match for a tag wins.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.keywords = rule.keywords.iter().map(|k| k.to_lowercase()).collect();
                rule
            })
            .collect();
        Self { rules }
    }

    pub fn with_rule(mut self, rule: KeywordRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> ChunkTags {
        let haystack = text.to_lowercase();
        let mut tags = ChunkTags::new();

        for rule in &self.rules {
            if tags.contains_key(&rule.tag) {
                continue;
            }
            if rule.keywords.iter().any(|k| haystack.contains(k.as_str())) {
                tags.insert(rule.tag.clone(), rule.value.clone());
            }
        }

        tags
    }
}

/// Keyword tagging when rules are configured, otherwise no tags.
pub fn classifier_from_rules(rules: Vec<KeywordRule>) -> Arc<dyn Classifier> {
    if rules.is_empty() {
        Arc::new(NoopClassifier)
    } else {
        Arc::new(KeywordClassifier::new(rules))
    }
}
