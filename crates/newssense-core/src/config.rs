use crate::app_config::{AppConfig, Environment, MatchMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are rejected. Tests
/// drive this with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = parse_usize(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("NEWSSENSE_ENV", "development"))?;
    let log_level = or_default("NEWSSENSE_LOG_LEVEL", "info");
    let holdings_path = PathBuf::from(or_default(
        "NEWSSENSE_HOLDINGS_PATH",
        "./config/holdings.yaml",
    ));
    let news_dir = PathBuf::from(or_default("NEWSSENSE_NEWS_DIR", "./data/news"));

    let top_k = parse_positive("NEWSSENSE_TOP_K", "3")?;
    let embedding_dim = parse_positive("NEWSSENSE_EMBEDDING_DIM", "384")?;
    let optional_url = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let embedding_url = optional_url("NEWSSENSE_EMBEDDING_URL");
    let summarizer_url = optional_url("NEWSSENSE_SUMMARIZER_URL");
    let model_timeout_secs = parse_u64("NEWSSENSE_MODEL_TIMEOUT_SECS", "30")?;

    let summary_short_text_tokens = parse_usize("NEWSSENSE_SUMMARY_SHORT_TEXT_TOKENS", "50")?;
    let summary_max_tokens = parse_positive("NEWSSENSE_SUMMARY_MAX_TOKENS", "50")?;
    let summary_min_tokens = parse_usize("NEWSSENSE_SUMMARY_MIN_TOKENS", "10")?;
    if summary_min_tokens > summary_max_tokens {
        return Err(invalid(
            "NEWSSENSE_SUMMARY_MIN_TOKENS",
            format!("{summary_min_tokens} exceeds NEWSSENSE_SUMMARY_MAX_TOKENS ({summary_max_tokens})"),
        ));
    }

    let title_max_chars = parse_positive("NEWSSENSE_TITLE_MAX_CHARS", "200")?;
    let match_mode = parse_match_mode(&or_default("NEWSSENSE_MATCH_MODE", "substring"))?;

    let enrich_concurrency = parse_positive("NEWSSENSE_ENRICH_CONCURRENCY", "4")?;
    let enrich_timeout_ms = match lookup("NEWSSENSE_ENRICH_TIMEOUT_MS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("NEWSSENSE_ENRICH_TIMEOUT_MS", e.to_string()))?,
        ),
        _ => None,
    };
    let index_cache_capacity = parse_usize("NEWSSENSE_INDEX_CACHE_CAPACITY", "16")?;

    let feed_base_url = or_default("NEWSSENSE_FEED_BASE_URL", "https://www.bing.com");
    let feed_timeout_secs = parse_u64("NEWSSENSE_FEED_TIMEOUT_SECS", "30")?;
    let feed_user_agent = or_default("NEWSSENSE_FEED_USER_AGENT", "newssense/0.1 (fund-news)");
    let feed_max_articles = parse_positive("NEWSSENSE_FEED_MAX_ARTICLES", "40")?;

    Ok(AppConfig {
        env,
        log_level,
        holdings_path,
        news_dir,
        top_k,
        embedding_dim,
        embedding_url,
        summarizer_url,
        model_timeout_secs,
        summary_short_text_tokens,
        summary_max_tokens,
        summary_min_tokens,
        title_max_chars,
        match_mode,
        enrich_concurrency,
        enrich_timeout_ms,
        index_cache_capacity,
        feed_base_url,
        feed_timeout_secs,
        feed_user_agent,
        feed_max_articles,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSSENSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_match_mode(s: &str) -> Result<MatchMode, ConfigError> {
    match s {
        "substring" => Ok(MatchMode::Substring),
        "word" | "word_boundary" => Ok(MatchMode::WordBoundary),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSSENSE_MATCH_MODE".to_string(),
            reason: format!("expected 'substring' or 'word', got '{other}'"),
        }),
    }
}
