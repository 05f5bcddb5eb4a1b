//! `analyze` command: rank stored news against a question.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use newssense_core::{parse_ticker, AppConfig};
use newssense_engine::{AnalysisResult, Engine, EngineConfig, Entity, Models};
use newssense_feeds::NewsStore;

use crate::fetch::fetch_and_store;
use crate::load_holdings_or_builtin;

#[derive(Debug)]
pub(crate) struct AnalyzeOptions {
    pub ticker: Option<String>,
    pub query: Option<String>,
    pub fetch: bool,
    pub top_k: Option<usize>,
    pub json: bool,
}

/// Pick the ticker: `--ticker` wins, then the first ticker in the query.
///
/// # Errors
///
/// Returns an error when neither yields a ticker.
pub(crate) fn resolve_ticker(ticker: Option<&str>, query: Option<&str>) -> anyhow::Result<String> {
    if let Some(t) = ticker.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(t.to_ascii_uppercase());
    }
    query
        .and_then(parse_ticker)
        .ok_or_else(|| anyhow::anyhow!("no ticker given; pass --ticker or name one in --query"))
}

pub(crate) fn default_query(ticker: &str) -> String {
    format!("Why is {ticker} down?")
}

/// # Errors
///
/// Returns an error if config, holdings, the news store or the engine fail.
pub(crate) async fn run_analyze(config: &AppConfig, options: AnalyzeOptions) -> anyhow::Result<()> {
    let ticker = resolve_ticker(options.ticker.as_deref(), options.query.as_deref())?;
    let query = options
        .query
        .clone()
        .unwrap_or_else(|| default_query(&ticker));
    let holdings = load_holdings_or_builtin(config)?;

    let articles = if options.fetch {
        fetch_and_store(config, &ticker, &[]).await?
    } else {
        NewsStore::new(&config.news_dir).load(&ticker)?
    };
    if articles.is_empty() {
        tracing::warn!(
            ticker = %ticker,
            "no stored news; run `fetch --ticker {ticker}` or pass --fetch"
        );
    }

    let mut engine_config = EngineConfig::from_app_config(config);
    if let Some(k) = options.top_k.and_then(NonZeroUsize::new) {
        engine_config.top_k = k;
    }
    let models = {
        let engine_config = engine_config.clone();
        let holdings = holdings.clone();
        tokio::task::spawn_blocking(move || Models::load(&engine_config, &holdings)).await??
    };
    let engine = Engine::new(Arc::new(models), engine_config);

    let results = engine
        .analyze(&articles, &holdings, &query, Some(ticker.as_str()))
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_report(&ticker, &query, &results, Utc::now()));
    }
    Ok(())
}

/// Markdown report of ranked results.
pub(crate) fn render_report(
    ticker: &str,
    query: &str,
    results: &[AnalysisResult],
    generated_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        format!("# News Impact Report: {ticker}"),
        String::new(),
        format!("**Generated**: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        format!("**Query**: {query}"),
        format!("**Articles**: {}", results.len()),
        String::new(),
        "---".to_string(),
    ];

    if results.is_empty() {
        lines.push(String::new());
        lines.push("No relevant articles found.".to_string());
    }

    for (rank, result) in results.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("## {}. {}", rank + 1, result.original_title));
        lines.push(String::new());
        if !result.link.is_empty() {
            lines.push(format!("- **Link**: {}", result.link));
        }
        lines.push(format!("- **Distance**: {:.4}", result.distance));
        lines.push(format!("- **Sentiment**: {:.2}", result.sentiment));
        lines.push(format!("- **Entities**: {}", format_entities(&result.entities)));
        lines.push(format!("- **Matched funds**: {}", or_none(&result.matched_funds)));
        lines.push(format!(
            "- **Matched {ticker} holdings**: {}",
            or_none(&result.matched_holdings)
        ));
        lines.push(String::new());
        lines.push(format!("> {}", result.summary));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn format_entities(entities: &[Entity]) -> String {
    if entities.is_empty() {
        return "none".to_string();
    }
    entities
        .iter()
        .map(|e| format!("{} ({})", e.text, e.label))
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
