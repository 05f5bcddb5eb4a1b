//! Analysis orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use newssense_core::{Article, Holdings, MatchMode};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cache::{CacheKey, IndexCache};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::index::{build_index, VectorIndex};
use crate::matcher::{match_funds, match_holdings};
use crate::models::Models;
use crate::normalize::normalize;
use crate::retriever::retrieve;
use crate::types::{AnalysisResult, EnrichmentRecord, NormalizedDocument};

/// Runs analyses against one shared [`Models`] bundle.
///
/// Cheap to share behind an `Arc`; concurrent `analyze` calls only contend on
/// the index cache lock.
#[derive(Debug)]
pub struct Engine {
    models: Arc<Models>,
    config: EngineConfig,
    cache: IndexCache,
}

impl Engine {
    #[must_use]
    pub fn new(models: Arc<Models>, config: EngineConfig) -> Self {
        let cache = IndexCache::new(config.index_cache_capacity);
        Self {
            models,
            config,
            cache,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Rank `articles` against `query` and enrich the top hits.
    ///
    /// Every model call runs on a blocking worker.
    ///
    /// 1. Normalize every article; blank ones are excluded.
    /// 2. Enrich each article (summary, sentiment, entities, fund matches) on
    ///    blocking workers, at most `enrich_concurrency` at a time.
    /// 3. Build the vector index over the articles that survived enrichment.
    /// 4. Retrieve the `top_k` nearest to the query.
    /// 5. Join each hit with its article and enrichment, in rank order.
    ///
    /// `ticker_hint` selects the fund whose holdings are reported in
    /// `matched_holdings` and scopes the index cache.
    ///
    /// An empty batch yields an empty result. A failure confined to one
    /// article drops that article with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] or
    /// [`EngineError::ModelUnavailable`] when the model bundle itself is
    /// unusable.
    pub async fn analyze(
        &self,
        articles: &[Article],
        holdings: &Holdings,
        query: &str,
        ticker_hint: Option<&str>,
    ) -> Result<Vec<AnalysisResult>, EngineError> {
        if articles.is_empty() {
            tracing::info!(query, "no articles to analyze");
            return Ok(Vec::new());
        }

        let documents = normalize_batch(articles);
        let mut records = self.enrich_all(&documents, holdings, ticker_hint).await?;

        let survivors: Vec<NormalizedDocument> = documents
            .into_iter()
            .filter(|d| records.contains_key(&d.source_article_index))
            .collect();
        let index = self.index_for(survivors, ticker_hint).await?;

        let hits = {
            let models = Arc::clone(&self.models);
            let index = Arc::clone(&index);
            let query = query.to_string();
            let k = self.config.top_k;
            tokio::task::spawn_blocking(move || {
                retrieve(&query, &index, models.embedder.as_ref(), k)
            })
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??
        };

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(article_index) = index.article_index(hit.position) else {
                continue;
            };
            let (Some(article), Some(record)) =
                (articles.get(article_index), records.remove(&article_index))
            else {
                continue;
            };
            results.push(AnalysisResult {
                original_title: truncate_chars(article.title.trim(), self.config.title_max_chars),
                link: article.link.clone(),
                distance: hit.distance,
                summary: record.summary,
                sentiment: record.sentiment,
                entities: record.entities,
                matched_funds: record.matched_funds,
                matched_holdings: record.matched_holdings,
            });
        }

        tracing::info!(
            articles = articles.len(),
            indexed = index.len(),
            results = results.len(),
            "analysis complete"
        );
        Ok(results)
    }

    /// Enrichment records keyed (and therefore ordered) by article index.
    async fn enrich_all(
        &self,
        documents: &[NormalizedDocument],
        holdings: &Holdings,
        ticker_hint: Option<&str>,
    ) -> Result<BTreeMap<usize, EnrichmentRecord>, EngineError> {
        let semaphore = Arc::new(Semaphore::new(self.config.enrich_concurrency.get()));
        let holdings = Arc::new(holdings.clone());
        let ticker_hint: Option<Arc<str>> = ticker_hint.map(Arc::from);
        let timeout = self.config.enrich_timeout;
        let mode = self.config.match_mode;

        let mut tasks = JoinSet::new();
        for doc in documents {
            let doc = doc.clone();
            let semaphore = Arc::clone(&semaphore);
            let models = Arc::clone(&self.models);
            let holdings = Arc::clone(&holdings);
            let ticker_hint = ticker_hint.clone();

            tasks.spawn(async move {
                let article_index = doc.source_article_index;
                let Ok(permit) = semaphore.acquire_owned().await else {
                    return (
                        article_index,
                        Err(EngineError::Task("enrichment semaphore closed".to_string())),
                    );
                };
                // The permit lives as long as the blocking work, which keeps
                // running after a timeout.
                let work = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    enrich_document(&models, &doc, &holdings, mode, ticker_hint.as_deref())
                });
                let joined = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, work).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            return (
                                article_index,
                                Err(EngineError::Timeout {
                                    stage: "enrichment",
                                    timeout_ms: u64::try_from(limit.as_millis())
                                        .unwrap_or(u64::MAX),
                                }),
                            );
                        }
                    },
                    None => work.await,
                };
                let outcome = joined
                    .map_err(|e| EngineError::Task(e.to_string()))
                    .and_then(|record| record);
                (article_index, outcome)
            });
        }

        let mut records = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (article_index, outcome) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "enrichment task lost");
                    continue;
                }
            };
            match outcome {
                Ok(record) => {
                    records.insert(article_index, record);
                }
                Err(e) if e.is_per_article() => {
                    tracing::warn!(
                        article = article_index,
                        error = %e,
                        "enrichment failed; article excluded"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            documents = documents.len(),
            enriched = records.len(),
            "enrichment finished"
        );
        Ok(records)
    }

    async fn index_for(
        &self,
        documents: Vec<NormalizedDocument>,
        ticker_hint: Option<&str>,
    ) -> Result<Arc<VectorIndex>, EngineError> {
        let key = CacheKey::new(ticker_hint, &documents);
        if let Some(index) = self.cache.get(&key) {
            tracing::debug!(rows = index.len(), "vector index cache hit");
            return Ok(index);
        }

        let models = Arc::clone(&self.models);
        let index = tokio::task::spawn_blocking(move || {
            build_index(&documents, models.embedder.as_ref())
        })
        .await
        .map_err(|e| EngineError::Task(e.to_string()))??;

        let index = Arc::new(index);
        self.cache.insert(key, Arc::clone(&index));
        Ok(index)
    }
}

/// Normalize every non-blank article, keeping batch positions.
fn normalize_batch(articles: &[Article]) -> Vec<NormalizedDocument> {
    let mut documents = Vec::with_capacity(articles.len());
    for (i, article) in articles.iter().enumerate() {
        if article.is_blank() {
            let e = EngineError::InvalidArticle {
                index: i,
                reason: "title and summary are both empty".to_string(),
            };
            tracing::warn!(article = i, error = %e, "article excluded");
            continue;
        }
        documents.push(normalize(i, article));
    }
    tracing::debug!(
        articles = articles.len(),
        documents = documents.len(),
        "articles normalized"
    );
    documents
}

fn enrich_document(
    models: &Models,
    doc: &NormalizedDocument,
    holdings: &Holdings,
    mode: MatchMode,
    ticker_hint: Option<&str>,
) -> Result<EnrichmentRecord, EngineError> {
    let summary = models.summarizer.summarize(&doc.plain)?;
    let sentiment = models.sentiment.score(&doc.plain)?.clamp(-1.0, 1.0);
    let entities = models.entities.extract(&doc.plain)?;

    // Cleaned text, not the stop-word-stripped form: stripping joins words
    // that were never adjacent in the article.
    let matched_funds = match_funds(&doc.plain, holdings, mode);
    let matched_holdings = ticker_hint
        .map(|ticker| match_holdings(&doc.plain, ticker, holdings, mode))
        .unwrap_or_default();

    Ok(EnrichmentRecord {
        summary,
        sentiment,
        entities,
        matched_funds,
        matched_holdings,
    })
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
