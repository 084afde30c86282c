//! HTTP client for sending chunks to the embedding service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::sink::{ChunkHandoff, ChunkSink};

/// Client that posts each chunk to the embedding service.
///
/// The service embeds the text and persists it; this client only checks
/// the response status.
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl EmbeddingClient {
    /// Create a new embedding client with a 30 second request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the embedding service is healthy.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl ChunkSink for EmbeddingClient {
    fn name(&self) -> &'static str {
        "embedding_service"
    }

    async fn accept(&self, handoff: &ChunkHandoff) -> Result<()> {
        let url = format!("{}/embed/chunk", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(handoff)
            .send()
            .await
            .with_context(|| format!("embedding request failed (timeout {:?})", self.timeout))?;

        let status = response.status();
        if status.is_success() {
            debug!(
                document_id = %handoff.document_id,
                ordinal = handoff.ordinal,
                "Chunk accepted by embedding service"
            );
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!(
                "Embedding service returned {}: {}",
                status,
                text
            ))
        }
    }
}
