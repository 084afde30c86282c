//! Segmenter Service - Main Entry Point
//!
//! HTTP front end for the segmentation engine and ingest jobs.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segmenter::api::{self, handlers::AppState};
use segmenter::output::{classifier_from_rules, ChunkSink, EmbeddingClient, LogSink};
use segmenter::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "segmenter=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env();

    info!("Starting Segmenter Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        hard_max_chars = config.limits.hard_max_chars,
        soft_target_chars = config.limits.soft_target_chars,
        paragraph_max_chars = config.policy.paragraph_max_chars,
        token_counter = ?config.token_counter,
        "Segmentation limits"
    );

    let sink: Arc<dyn ChunkSink> = match config.embedding_service_url.as_deref() {
        Some(url) => {
            let client = EmbeddingClient::with_timeout(
                url,
                Duration::from_secs(config.embedding_timeout_secs),
            )?;
            if !client.health_check().await? {
                warn!(url, "Embedding service is not healthy yet");
            }
            Arc::new(client)
        }
        None => {
            warn!("EMBEDDING_SERVICE_URL not set, chunks will only be logged");
            Arc::new(LogSink)
        }
    };

    if !config.keyword_rules.is_empty() {
        info!(rules = config.keyword_rules.len(), "Keyword tagging enabled");
    }
    let classifier = classifier_from_rules(config.keyword_rules.clone());

    let port = config.port;
    let state = Arc::new(AppState::new(config, classifier, sink)?);

    // Build HTTP routes
    let app = api::router(state).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
