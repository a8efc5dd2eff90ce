/// Embedding & Indexing
///
/// This module turns chunk text into vectors and keeps them in an in-memory
/// index for similarity search.
/// Architecture:
/// - EmbeddingProvider trait for abstraction
/// - OpenAiEmbedder for hosted embeddings (text-embedding-3-small, 1536-dim)
/// - FastEmbedProvider for local embedding (all-MiniLM-L6-v2, 384-dim)
/// - HashingEmbedder for deterministic offline vectors
/// - CachedEmbedder memoizes vectors by text hash
/// - VectorIndex for exact nearest-neighbor search
mod cache;
mod hashing;
mod openai;
mod provider;
mod vector_index;

pub use cache::CachedEmbedder;
pub use hashing::HashingEmbedder;
pub use openai::OpenAiEmbedder;
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
pub use vector_index::{IndexError, SearchHit, VectorIndex};

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::{DocentError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Build the configured embedding provider, wrapped in a memoizing cache
pub fn provider_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let inner: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingBackend::OpenAi => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                DocentError::Config(format!(
                    "Environment variable {} is not set",
                    config.api_key_env
                ))
            })?;
            Arc::new(OpenAiEmbedder::new(
                &api_key,
                &config.base_url,
                &config.model,
                config.dimension,
                Duration::from_secs(config.timeout_secs),
                config.batch_size,
            )?)
        }
        EmbeddingBackend::FastEmbed => Arc::new(FastEmbedProvider::new(&config.model)?),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dimension)),
    };

    tracing::info!(
        "Embedding provider: {} ({}D)",
        inner.model_name(),
        inner.dimension()
    );

    Ok(Arc::new(CachedEmbedder::new(inner)))
}
