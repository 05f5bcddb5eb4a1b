use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A query or document vector does not share the index dimension.
    /// Only happens if two different embedders are mixed.
    #[error("embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("{stage} failed: {reason}")]
    Inference { stage: &'static str, reason: String },

    #[error("invalid article at position {index}: {reason}")]
    InvalidArticle { index: usize, reason: String },

    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },

    /// An enrichment worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Task(String),
}

impl EngineError {
    /// Errors that exclude a single article instead of failing the batch.
    #[must_use]
    pub fn is_per_article(&self) -> bool {
        matches!(
            self,
            EngineError::Inference { .. }
                | EngineError::InvalidArticle { .. }
                | EngineError::Timeout { .. }
                | EngineError::Task(_)
        )
    }
}
