//! `fetch` command: pull ticker news from the feed and store it.

use newssense_core::{AppConfig, Article};
use newssense_feeds::{FeedClient, NewsStore};

/// Fetch news for `ticker` and write it to the news directory.
///
/// Returns the fetched articles so `analyze --fetch` can reuse them.
///
/// # Errors
///
/// Returns an error if the feed request fails or the file cannot be written.
pub(crate) async fn fetch_and_store(
    config: &AppConfig,
    ticker: &str,
    keywords: &[String],
) -> anyhow::Result<Vec<Article>> {
    let client = FeedClient::new(
        &config.feed_base_url,
        config.feed_timeout_secs,
        &config.feed_user_agent,
    )?;
    let articles = client
        .fetch_ticker_news(ticker, keywords, config.feed_max_articles)
        .await?;

    let store = NewsStore::new(&config.news_dir);
    store.save(ticker, &articles)?;
    Ok(articles)
}

/// # Errors
///
/// Same as [`fetch_and_store`].
pub(crate) async fn run_fetch(
    config: &AppConfig,
    ticker: &str,
    keywords: &[String],
) -> anyhow::Result<()> {
    let ticker = ticker.trim().to_ascii_uppercase();
    let articles = fetch_and_store(config, &ticker, keywords).await?;
    let path = NewsStore::new(&config.news_dir).path_for(&ticker)?;
    println!(
        "saved {} articles for {ticker} to {}",
        articles.len(),
        path.display()
    );
    Ok(())
}
