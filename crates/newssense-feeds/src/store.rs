//! Per-ticker JSON article files.

use std::path::{Path, PathBuf};

use newssense_core::Article;

use crate::error::FeedError;

/// A directory of `news_<TICKER>.json` files, each a JSON array of articles.
#[derive(Debug, Clone)]
pub struct NewsStore {
    dir: PathBuf,
}

impl NewsStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `ticker`'s articles. The ticker is upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidTicker`] unless the ticker is 1-10 ASCII
    /// letters, digits, `.` or `-`, starting with a letter or digit.
    pub fn path_for(&self, ticker: &str) -> Result<PathBuf, FeedError> {
        let valid = !ticker.is_empty()
            && ticker.len() <= 10
            && ticker.starts_with(|c: char| c.is_ascii_alphanumeric())
            && ticker
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(FeedError::InvalidTicker(ticker.to_string()));
        }
        Ok(self
            .dir
            .join(format!("news_{}.json", ticker.to_ascii_uppercase())))
    }

    /// Write `articles` as pretty JSON, replacing any earlier file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if the directory or file cannot be written.
    pub fn save(&self, ticker: &str, articles: &[Article]) -> Result<PathBuf, FeedError> {
        let path = self.path_for(ticker)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| FeedError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let json = serde_json::to_string_pretty(articles).map_err(|e| FeedError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| FeedError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::info!(ticker, articles = articles.len(), path = %path.display(), "news saved");
        Ok(path)
    }

    /// Articles stored for `ticker`; empty when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] on read failure or [`FeedError::Json`] if the
    /// file is not a JSON array of articles.
    pub fn load(&self, ticker: &str) -> Result<Vec<Article>, FeedError> {
        let path = self.path_for(ticker)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(ticker, path = %path.display(), "no stored news");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(FeedError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| FeedError::Json {
            path: path.display().to_string(),
            source: e,
        })
    }
}
