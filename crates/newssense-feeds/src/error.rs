use thiserror::Error;

/// Errors from fetching, parsing or storing news.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("RSS parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("news store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("news store JSON error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A ticker that cannot be used in a file name.
    #[error("invalid ticker {0:?}")]
    InvalidTicker(String),
}
