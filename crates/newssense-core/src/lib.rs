//! Shared records and configuration for NewsSense.
//!
//! Holds the boundary types every other crate agrees on: the scraped
//! [`Article`], the fund [`Holdings`] table, the upstream ticker-hint parser,
//! and the environment-driven [`AppConfig`].

pub mod app_config;
pub mod article;
pub mod config;
pub mod holdings;
pub mod ticker;

pub use app_config::{AppConfig, Environment, MatchMode};
pub use article::Article;
pub use config::{load_app_config, load_app_config_from_env};
pub use holdings::{load_holdings, FundHoldings, Holdings};
pub use ticker::parse_ticker;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read holdings file {path}: {source}")]
    HoldingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse holdings file: {0}")]
    HoldingsFileParse(#[source] serde_yaml::Error),

    #[error("holdings validation failed: {0}")]
    Validation(String),
}
