//! News relevance and fund-impact analysis.
//!
//! Given a batch of scraped [`newssense_core::Article`]s, a fund holdings
//! table and a free-text question, [`Engine::analyze`] ranks the articles by
//! semantic closeness to the question and annotates the top hits with a
//! summary, a sentiment polarity, named entities and the funds whose holdings
//! they mention.
//!
//! Model back-ends sit behind the [`Embedder`], [`Summarizer`],
//! [`SentimentScorer`] and [`EntityExtractor`] traits and are bundled in
//! [`Models`], built once per process. [`Models::load`] picks a TEI sentence
//! encoder and a hosted summarizer when their URLs are configured.

pub mod cache;
pub mod config;
pub mod embeddings;
pub mod entities;
pub mod error;
mod http;
pub mod index;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod retriever;
pub mod scorer;
pub mod stopwords;
pub mod summarize;
pub mod types;

pub use cache::{CacheKey, IndexCache};
pub use config::EngineConfig;
pub use embeddings::{Embedder, Embedding, HashingEmbedder, TeiEmbedder};
pub use entities::{EntityExtractor, RuleEntityExtractor};
pub use error::EngineError;
pub use index::{build_index, Neighbor, VectorIndex};
pub use matcher::{match_funds, match_holdings};
pub use models::Models;
pub use normalize::{normalize, normalize_text};
pub use pipeline::Engine;
pub use retriever::retrieve;
pub use scorer::{lexicon_score, LexiconSentiment, SentimentScorer};
pub use summarize::{ExtractiveSummarizer, RemoteSummarizer, Summarizer, SummaryLimits};
pub use types::{AnalysisResult, EnrichmentRecord, Entity, EntityLabel, NormalizedDocument};
