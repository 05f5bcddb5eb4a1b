//! Bing News RSS client.

use std::time::Duration;

use newssense_core::Article;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::FeedError;
use crate::rss::parse_rss_feed;

/// Fetches ticker news from a Bing-compatible `/news/search` RSS endpoint.
///
/// Point `base_url` at a mock server in tests.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search URL for a ticker plus extra keywords.
    #[must_use]
    pub fn search_url(&self, ticker: &str, keywords: &[String]) -> String {
        let query = std::iter::once(ticker)
            .chain(keywords.iter().map(String::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC);
        format!(
            "{}/news/search?q={encoded}&format=rss&mkt=en-US",
            self.base_url
        )
    }

    /// Fetch up to `max_articles` recent articles about `ticker`.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] on network failure.
    /// - [`FeedError::UnexpectedStatus`] on a non-2xx response.
    /// - [`FeedError::Xml`] if the body is not valid RSS.
    pub async fn fetch_ticker_news(
        &self,
        ticker: &str,
        keywords: &[String],
        max_articles: usize,
    ) -> Result<Vec<Article>, FeedError> {
        let url = self.search_url(ticker, keywords);
        tracing::debug!(ticker, url = %url, "fetching news feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let articles = parse_rss_feed(&body, max_articles)?;
        tracing::info!(ticker, articles = articles.len(), "news feed fetched");
        Ok(articles)
    }
}
