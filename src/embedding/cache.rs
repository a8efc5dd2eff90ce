/// Memoizing wrapper around any embedding provider
use super::{EmbeddingError, EmbeddingProvider};
use ahash::AHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Caches vectors by the blake3 hash of the input text
///
/// Repeated texts (identical chunks, repeated questions, rebuilds with the
/// same document) reuse the stored vector instead of calling the provider.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: RwLock<AHashMap<blake3::Hash, Vec<f32>>>,
    hits: AtomicU64,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            cache: RwLock::new(AHashMap::new()),
            hits: AtomicU64::new(0),
        }
    }

    /// Number of texts served from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of distinct texts cached
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &blake3::Hash) -> Option<Vec<f32>> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        let found = cache.get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    fn store(&self, key: blake3::Hash, vector: Vec<f32>) {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.insert(key, vector);
    }
}

impl EmbeddingProvider for CachedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = blake3::hash(text.as_bytes());
        if let Some(vector) = self.lookup(&key) {
            return Ok(vector);
        }

        let vector = self.inner.embed(text)?;
        self.store(key, vector.clone());
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let keys: Vec<blake3::Hash> = texts.iter().map(|t| blake3::hash(t.as_bytes())).collect();
        let mut vectors: Vec<Option<Vec<f32>>> = keys.iter().map(|k| self.lookup(k)).collect();

        let missing: Vec<usize> = vectors
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();

        if !missing.is_empty() {
            let to_embed: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let fresh = self.inner.embed_batch(&to_embed)?;

            if fresh.len() != missing.len() {
                return Err(EmbeddingError::GenerationError(format!(
                    "Embedding count mismatch: expected {}, got {}",
                    missing.len(),
                    fresh.len()
                )));
            }

            for (i, vector) in missing.iter().copied().zip(fresh) {
                self.store(keys[i], vector.clone());
                vectors[i] = Some(vector);
            }
        }

        debug!(
            "Embedded {} texts ({} from cache)",
            texts.len(),
            texts.len() - missing.len()
        );

        vectors
            .into_iter()
            .map(|v| {
                v.ok_or_else(|| EmbeddingError::GenerationError("missing embedding".to_string()))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
