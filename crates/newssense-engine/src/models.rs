//! The shared model bundle.

use newssense_core::Holdings;

use crate::config::EngineConfig;
use crate::embeddings::{Embedder, HashingEmbedder, TeiEmbedder};
use crate::entities::{EntityExtractor, RuleEntityExtractor};
use crate::error::EngineError;
use crate::scorer::{LexiconSentiment, SentimentScorer};
use crate::summarize::{ExtractiveSummarizer, RemoteSummarizer, Summarizer};

/// Every inference back-end the engine needs, loaded once per process.
///
/// Share it behind an `Arc`; all members are read-only and `Send + Sync`.
pub struct Models {
    pub embedder: Box<dyn Embedder>,
    pub summarizer: Box<dyn Summarizer>,
    pub sentiment: Box<dyn SentimentScorer>,
    pub entities: Box<dyn EntityExtractor>,
}

impl Models {
    /// The configured back-ends: the TEI embedder and remote summarizer when
    /// their URLs are set, the offline ones otherwise.
    ///
    /// HTTP back-ends block, so call this from `spawn_blocking` when a
    /// service URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] if an HTTP client cannot be built.
    pub fn load(config: &EngineConfig, holdings: &Holdings) -> Result<Self, EngineError> {
        let mut models = Self::local(config, holdings);

        match config.embedding_url.as_deref() {
            Some(url) => {
                tracing::info!(url, dim = config.embedding_dim, "using TEI embedder");
                models.embedder = Box::new(TeiEmbedder::new(
                    url,
                    config.embedding_dim,
                    config.model_timeout,
                )?);
            }
            None => tracing::warn!(
                "no embedding service configured; ranking falls back to word overlap"
            ),
        }

        if let Some(url) = config.summarizer_url.as_deref() {
            tracing::info!(url, "using remote summarizer");
            models.summarizer = Box::new(RemoteSummarizer::new(
                url,
                config.summary,
                config.model_timeout,
            )?);
        }

        Ok(models)
    }

    /// The built-in offline back-ends. Embeddings are lexical hashes, so
    /// ranking reflects shared words rather than meaning.
    ///
    /// Every configured holding name is added to the organization gazetteer
    /// so fund constituents are tagged `ORG` even when the built-in list
    /// lacks them.
    #[must_use]
    pub fn local(config: &EngineConfig, holdings: &Holdings) -> Self {
        let names = holdings.all_names();
        tracing::debug!(
            embedding_dim = config.embedding_dim,
            holding_names = names.len(),
            "loading local models"
        );
        Self {
            embedder: Box::new(HashingEmbedder::new(config.embedding_dim)),
            summarizer: Box::new(ExtractiveSummarizer::new(config.summary)),
            sentiment: Box::new(LexiconSentiment),
            entities: Box::new(RuleEntityExtractor::with_organizations(names)),
        }
    }
}

impl std::fmt::Debug for Models {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Models")
            .field("embedding_dim", &self.embedder.dim())
            .finish_non_exhaustive()
    }
}
