use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How holding names are located inside article text.
///
/// `Substring` is plain case-insensitive containment and will flag short
/// names ("A", "GE") inside unrelated words. `WordBoundary` additionally
/// requires the match to sit between non-alphanumeric characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    WordBoundary,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::WordBoundary => write!(f, "word"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub holdings_path: PathBuf,
    pub news_dir: PathBuf,
    pub top_k: usize,
    pub embedding_dim: usize,
    /// Base URL of a TEI embedding server; `None` uses the local hashing embedder.
    pub embedding_url: Option<String>,
    /// Summarization endpoint; `None` uses the local extractive summarizer.
    pub summarizer_url: Option<String>,
    pub model_timeout_secs: u64,
    pub summary_short_text_tokens: usize,
    pub summary_max_tokens: usize,
    pub summary_min_tokens: usize,
    pub title_max_chars: usize,
    pub match_mode: MatchMode,
    pub enrich_concurrency: usize,
    pub enrich_timeout_ms: Option<u64>,
    pub index_cache_capacity: usize,
    pub feed_base_url: String,
    pub feed_timeout_secs: u64,
    pub feed_user_agent: String,
    pub feed_max_articles: usize,
}
