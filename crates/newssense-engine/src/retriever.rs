//! Top-K query retrieval against a built [`VectorIndex`].

use std::num::NonZeroUsize;

use crate::embeddings::Embedder;
use crate::error::EngineError;
use crate::index::{Neighbor, VectorIndex};
use crate::normalize::normalize_text;

/// Embed `query` and return the `min(k, index.len())` nearest documents,
/// ascending by squared L2 distance, ties in insertion order.
///
/// The query goes through the same normalization as the corpus. An empty
/// index yields an empty result without touching the embedder.
///
/// # Errors
///
/// Returns [`EngineError::ModelUnavailable`] if the query cannot be embedded,
/// or [`EngineError::DimensionMismatch`] if `embedder` is not the one the
/// index was built with.
pub fn retrieve(
    query: &str,
    index: &VectorIndex,
    embedder: &dyn Embedder,
    k: NonZeroUsize,
) -> Result<Vec<Neighbor>, EngineError> {
    if index.is_empty() {
        tracing::debug!("retrieval against an empty index");
        return Ok(Vec::new());
    }

    let normalized = normalize_text(query);
    let vector = embedder
        .embed(&normalized)
        .map_err(|e| EngineError::ModelUnavailable(format!("query embedding: {e}")))?;

    let hits = index.search(&vector, k)?;
    tracing::debug!(k = k.get(), hits = hits.len(), "query retrieved");
    Ok(hits)
}
