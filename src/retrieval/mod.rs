//! Top-k retrieval over a built vector index

use crate::embedding::{EmbeddingProvider, SearchHit, VectorIndex};
use crate::error::{DocentError, Result};
use crate::ingest::Chunk;
use std::sync::Arc;
use tracing::debug;

/// Embeds queries and returns the `top_k` nearest chunks
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: VectorIndex, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(DocentError::Config(
                "top_k must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            embedder,
            index,
            top_k,
        })
    }

    /// Nearest chunks to `query`, closest first
    ///
    /// Fewer than `top_k` chunks come back only when the index is smaller.
    pub fn retrieve(&self, query: &str) -> Result<Vec<Chunk>> {
        Ok(self
            .retrieve_scored(query)?
            .into_iter()
            .map(|hit| hit.chunk)
            .collect())
    }

    /// Like [`retrieve`](Self::retrieve) but keeps distances
    pub fn retrieve_scored(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query_embedding = self.embedder.embed(query)?;
        let hits = self.index.search(&query_embedding, self.top_k)?;

        debug!(
            "Retrieved {} chunks (k={}): {:?}",
            hits.len(),
            self.top_k,
            hits.iter().map(|h| h.chunk.ordinal).collect::<Vec<_>>()
        );

        Ok(hits)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;

    fn build(texts: &[&str], top_k: usize) -> Retriever {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::default());
        let entries = texts
            .iter()
            .enumerate()
            .map(|(ordinal, text)| {
                let chunk = Chunk {
                    text: text.to_string(),
                    page: 0,
                    ordinal,
                };
                let vector = embedder.embed(text).unwrap();
                (chunk, vector)
            })
            .collect();
        let index = VectorIndex::build(entries).unwrap();
        Retriever::new(embedder, index, top_k).unwrap()
    }

    #[test]
    fn test_top_k_of_ten() {
        let texts = [
            "budget", "timeline", "staffing", "risks", "vendors", "training", "travel",
            "equipment", "reporting", "outreach",
        ];
        let retriever = build(&texts, 3);
        assert_eq!(retriever.index().len(), 10);
        assert_eq!(retriever.retrieve("risks").unwrap().len(), 3);
        assert_eq!(retriever.retrieve("risks").unwrap()[0].text, "risks");
    }

    #[test]
    fn test_small_index_returns_all() {
        let retriever = build(&["one", "two"], 5);
        assert_eq!(retriever.retrieve("one").unwrap().len(), 2);
    }

    #[test]
    fn test_zero_k_rejected() {
        let index = VectorIndex::build(Vec::new()).unwrap();
        let result = Retriever::new(Arc::new(HashingEmbedder::default()), index, 0);
        assert!(matches!(result, Err(DocentError::Config(_))));
    }

    #[test]
    fn test_empty_query_is_embedding_error() {
        let retriever = build(&["one"], 1);
        assert!(matches!(
            retriever.retrieve(""),
            Err(DocentError::EmbeddingService(_))
        ));
    }
}
