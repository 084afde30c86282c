//! Output module for handing chunks to downstream services.

mod classify;
mod embedding_client;
mod sink;

pub use classify::{
    classifier_from_rules, ChunkTags, Classifier, KeywordClassifier, KeywordRule, NoopClassifier,
};
pub use embedding_client::EmbeddingClient;
pub use sink::{ChunkHandoff, ChunkSink, LogSink};
