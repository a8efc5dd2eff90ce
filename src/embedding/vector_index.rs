/// Exact in-memory vector index for similarity search
use crate::ingest::Chunk;
use ndarray::{Array2, ArrayView1};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Zero-length vector for chunk {ordinal}")]
    EmptyVector { ordinal: usize },

    #[error("Index construction failed: {0}")]
    ShapeError(String),
}

/// Search result with the matched chunk and its distance to the query
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    /// Squared euclidean distance (lower is more similar)
    pub distance: f32,
    /// Insertion position in the index
    pub position: usize,
}

/// Flat vector index
///
/// Stores one row per chunk, in insertion order, and answers queries by
/// exhaustive squared-L2 comparison. Immutable once built.
#[derive(Debug)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    vectors: Array2<f32>,
}

impl VectorIndex {
    /// Build an index from (chunk, vector) pairs; all vectors must share a dimension
    pub fn build(entries: Vec<(Chunk, Vec<f32>)>) -> Result<Self, IndexError> {
        let dimension = match entries.first() {
            Some((chunk, vector)) if vector.is_empty() => {
                return Err(IndexError::EmptyVector {
                    ordinal: chunk.ordinal,
                })
            }
            Some((_, vector)) => vector.len(),
            None => 0,
        };

        let mut chunks = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len() * dimension);

        for (chunk, vector) in entries {
            if vector.len() != dimension {
                return Err(IndexError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(&vector);
            chunks.push(chunk);
        }

        let vectors = Array2::from_shape_vec((chunks.len(), dimension), data)
            .map_err(|e| IndexError::ShapeError(e.to_string()))?;

        Ok(Self { chunks, vectors })
    }

    /// Return up to `k` nearest chunks, closest first
    ///
    /// Exactly `min(k, len)` hits are returned. Equal distances keep
    /// insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension() {
            return Err(IndexError::InvalidDimension {
                expected: self.dimension(),
                actual: query.len(),
            });
        }

        let query = ArrayView1::from(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .outer_iter()
            .enumerate()
            .map(|(position, row)| {
                let diff = &row - &query;
                (position, diff.dot(&diff))
            })
            .collect();

        // Stable sort keeps insertion order among ties
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(position, distance)| SearchHit {
                chunk: self.chunks[position].clone(),
                distance,
                position,
            })
            .collect())
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if index is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get vector dimension
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Chunks in insertion order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}
