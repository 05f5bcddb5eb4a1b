//! Flat (exhaustive) vector index over squared L2 distance.

use std::num::NonZeroUsize;

use crate::embeddings::{Embedder, Embedding};
use crate::error::EngineError;
use crate::types::NormalizedDocument;

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Insertion position inside the index.
    pub position: usize,
    /// Squared L2 distance to the query.
    pub distance: f32,
}

/// Embeddings stored row-major in one buffer, plus the article each row
/// came from.
///
/// Built in one go by [`build_index`]; there is no in-place mutation after
/// construction, so a half-built index is never observable.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
    article_indices: Vec<usize>,
}

impl VectorIndex {
    fn with_capacity(dim: usize, capacity: usize) -> Self {
        Self {
            dim,
            data: Vec::with_capacity(dim * capacity),
            article_indices: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, article_index: usize, embedding: &[f32]) -> Result<(), EngineError> {
        if embedding.len() != self.dim {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim,
                actual: embedding.len(),
            });
        }
        self.data.extend_from_slice(embedding);
        self.article_indices.push(article_index);
        Ok(())
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.article_indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.article_indices.is_empty()
    }

    /// Article index stored at an index position.
    #[must_use]
    pub fn article_index(&self, position: usize) -> Option<usize> {
        self.article_indices.get(position).copied()
    }

    /// The `min(k, len)` nearest rows, ascending by distance.
    ///
    /// Equal distances keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], k: NonZeroUsize) -> Result<Vec<Neighbor>, EngineError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2(row, query),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k.get());
        Ok(hits)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Embed `documents` and build a flat index over them, in document order.
///
/// The batch is embedded in one call. If that call fails, documents are
/// embedded one at a time and those that still fail are left out of the
/// index with a warning.
///
/// # Errors
///
/// Returns [`EngineError::DimensionMismatch`] if the embedder returns a vector
/// whose length differs from [`Embedder::dim`], or
/// [`EngineError::ModelUnavailable`] if the embedder cannot be reached.
pub fn build_index(
    documents: &[NormalizedDocument],
    embedder: &dyn Embedder,
) -> Result<VectorIndex, EngineError> {
    let mut index = VectorIndex::with_capacity(embedder.dim(), documents.len());
    if documents.is_empty() {
        return Ok(index);
    }

    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    match embed_all(embedder, &texts) {
        Ok(vectors) => {
            for (doc, vector) in documents.iter().zip(&vectors) {
                index.push(doc.source_article_index, vector)?;
            }
        }
        Err(e) if !e.is_per_article() => return Err(e),
        Err(e) => {
            tracing::warn!(
                documents = documents.len(),
                error = %e,
                "batch embedding failed; retrying per document"
            );
            for doc in documents {
                match embedder.embed(&doc.text) {
                    Ok(vector) => index.push(doc.source_article_index, &vector)?,
                    Err(e) if !e.is_per_article() => return Err(e),
                    Err(e) => tracing::warn!(
                        article = doc.source_article_index,
                        error = %e,
                        "embedding failed; article excluded"
                    ),
                }
            }
        }
    }

    tracing::debug!(rows = index.len(), dim = index.dim(), "vector index built");
    Ok(index)
}

fn embed_all(embedder: &dyn Embedder, texts: &[&str]) -> Result<Vec<Embedding>, EngineError> {
    let vectors = embedder.embed_batch(texts)?;
    if vectors.len() != texts.len() {
        return Err(EngineError::Inference {
            stage: "embedding",
            reason: format!(
                "embedder returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            ),
        });
    }
    Ok(vectors)
}
