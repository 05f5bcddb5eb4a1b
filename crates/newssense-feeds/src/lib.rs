//! News collection for NewsSense.
//!
//! Fetches ticker news from Bing News RSS into [`newssense_core::Article`]s and
//! keeps one JSON file of articles per ticker on disk.

pub mod bing_rss;
pub mod error;
pub mod rss;
pub mod store;

pub use bing_rss::FeedClient;
pub use error::FeedError;
pub use rss::parse_rss_feed;
pub use store::NewsStore;
