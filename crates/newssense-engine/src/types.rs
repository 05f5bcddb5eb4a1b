use serde::Serialize;

/// Cleaned text derived from one [`newssense_core::Article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Position of the source article in the analyzed batch.
    pub source_article_index: usize,
    /// Lower-cased tokens with stop-words and punctuation removed, space-joined.
    /// This is what gets embedded.
    pub text: String,
    /// `"{title}. {summary}"` with markup stripped and whitespace collapsed,
    /// original casing kept. Enrichment reads this.
    pub plain: String,
}

/// Named-entity categories, using the OntoNotes label strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityLabel {
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "PERSON")]
    Person,
    #[serde(rename = "GPE")]
    Location,
    #[serde(rename = "MONEY")]
    Money,
    #[serde(rename = "PERCENT")]
    Percent,
    #[serde(rename = "DATE")]
    Date,
}

impl EntityLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityLabel::Organization => "ORG",
            EntityLabel::Person => "PERSON",
            EntityLabel::Location => "GPE",
            EntityLabel::Money => "MONEY",
            EntityLabel::Percent => "PERCENT",
            EntityLabel::Date => "DATE",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Per-article signals computed independently of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRecord {
    pub summary: String,
    /// Polarity in `[-1.0, 1.0]`.
    pub sentiment: f32,
    pub entities: Vec<Entity>,
    /// Funds with at least one holding named in the article.
    pub matched_funds: Vec<String>,
    /// Holdings of the query's ticker named in the article.
    pub matched_holdings: Vec<String>,
}

/// One ranked output row, most relevant first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub original_title: String,
    pub link: String,
    /// Squared L2 distance between the query and the article embedding.
    pub distance: f32,
    pub summary: String,
    pub sentiment: f32,
    pub entities: Vec<Entity>,
    pub matched_funds: Vec<String>,
    pub matched_holdings: Vec<String>,
}
