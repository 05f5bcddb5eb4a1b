use serde::{Deserialize, Serialize};

/// A news item as handed over by a scraper.
///
/// Missing fields deserialize to empty strings. `summary` may still carry
/// HTML markup; cleaning happens in the engine's normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub summary: String,
}

impl Article {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            summary: summary.into(),
        }
    }

    /// `true` when neither the title nor the summary carries any text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.summary.trim().is_empty()
    }

    /// The `(title, link)` pair that identifies an article.
    #[must_use]
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.link)
    }
}
