use std::num::NonZeroUsize;
use std::time::Duration;

use newssense_core::{AppConfig, MatchMode};

use crate::summarize::SummaryLimits;

/// Runtime knobs for [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Results returned per query.
    pub top_k: NonZeroUsize,
    pub embedding_dim: usize,
    /// TEI server used by [`crate::Models::load`]; `None` means offline.
    pub embedding_url: Option<String>,
    /// Summarization endpoint used by [`crate::Models::load`].
    pub summarizer_url: Option<String>,
    /// Per-request bound for the HTTP model back-ends.
    pub model_timeout: Duration,
    pub summary: SummaryLimits,
    /// `original_title` is cut to this many characters.
    pub title_max_chars: usize,
    pub match_mode: MatchMode,
    /// Upper bound on articles enriched at the same time.
    pub enrich_concurrency: NonZeroUsize,
    /// Per-article enrichment bound; `None` waits indefinitely.
    pub enrich_timeout: Option<Duration>,
    /// Built indexes kept in memory; 0 disables caching.
    pub index_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
            embedding_dim: 384,
            embedding_url: None,
            summarizer_url: None,
            model_timeout: Duration::from_secs(30),
            summary: SummaryLimits::default(),
            title_max_chars: 200,
            match_mode: MatchMode::Substring,
            enrich_concurrency: NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN),
            enrich_timeout: None,
            index_cache_capacity: 16,
        }
    }
}

impl EngineConfig {
    /// Engine settings from the process configuration.
    ///
    /// Zero counts are already rejected by `AppConfig` validation; they fall
    /// back to one here rather than panicking.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            top_k: NonZeroUsize::new(config.top_k).unwrap_or(NonZeroUsize::MIN),
            embedding_dim: config.embedding_dim,
            embedding_url: config.embedding_url.clone(),
            summarizer_url: config.summarizer_url.clone(),
            model_timeout: Duration::from_secs(config.model_timeout_secs),
            summary: SummaryLimits {
                short_text_tokens: config.summary_short_text_tokens,
                max_tokens: config.summary_max_tokens,
                min_tokens: config.summary_min_tokens,
            },
            title_max_chars: config.title_max_chars,
            match_mode: config.match_mode,
            enrich_concurrency: NonZeroUsize::new(config.enrich_concurrency)
                .unwrap_or(NonZeroUsize::MIN),
            enrich_timeout: config.enrich_timeout_ms.map(Duration::from_millis),
            index_cache_capacity: config.index_cache_capacity,
        }
    }
}
