//! Rule-based named-entity extraction.
//!
//! Combines gazetteers (organizations, people, places), a corporate-suffix
//! pattern, role-prefixed person names, and numeric patterns for money,
//! percentages and dates. Overlapping candidates resolve to the earliest
//! span, then the longest.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::EngineError;
use crate::types::{Entity, EntityLabel};

/// Finds named entities in text, in text order.
pub trait EntityExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EngineError::Inference`] if the backing model fails.
    fn extract(&self, text: &str) -> Result<Vec<Entity>, EngineError>;
}

const KNOWN_ORGANIZATIONS: &[&str] = &[
    "Alphabet", "Amazon", "AMD", "Apple", "ARK Invest", "Berkshire", "Berkshire Hathaway",
    "BlackRock", "Bloomberg", "Broadcom", "Coinbase", "Dow Jones", "Exxon", "ExxonMobil",
    "Facebook", "Fed", "Federal Reserve", "Goldman Sachs", "Google", "Intel", "Invesco",
    "Johnson & Johnson", "JPMorgan", "Meta", "Microsoft", "Morgan Stanley", "Nasdaq", "Netflix",
    "NVIDIA", "NYSE", "OpenAI", "Palantir", "Pfizer", "Reuters", "Roku", "S&P 500", "SEC",
    "Tesla", "Vanguard", "Walmart",
];

const KNOWN_PEOPLE: &[&str] = &[
    "Andy Jassy", "Cathie Wood", "Elon Musk", "Jensen Huang", "Jerome Powell", "Mark Zuckerberg",
    "Satya Nadella", "Sundar Pichai", "Tim Cook", "Warren Buffett",
];

const KNOWN_PLACES: &[&str] = &[
    "Austin", "Beijing", "California", "Canada", "China", "Europe", "Germany", "India", "Japan",
    "London", "Mexico", "New York", "Russia", "Taiwan", "Texas", "Tokyo", "U.K.", "U.S.", "UK",
    "Ukraine", "United Kingdom", "United States", "US", "Washington",
];

static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|billion|trillion|bn|[MBK])\b)?|\b\d[\d,]*(?:\.\d+)?\s(?:million|billion|trillion\s)?(?:dollars|USD)\b",
    )
    .expect("valid money regex")
});

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?\s?(?:%|percent\b|per cent\b)").expect("valid percent regex")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:",
        r"Q[1-4](?:\s(?:19|20)\d{2})?",
        r"|(?:January|February|March|April|May|June|July|August|September|October|November|December",
        r"|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?(?:\s\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s(?:19|20)\d{2})?",
        r"|Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday",
        r"|[Tt]oday|[Yy]esterday|[Tt]omorrow",
        r"|(?:19|20)\d{2}",
        r")\b",
    ))
    .expect("valid date regex")
});

static CORPORATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b[A-Z][A-Za-z0-9&'\-]*(?:\s+[A-Z][A-Za-z0-9&'\-]*){0,3}\s+",
        r"(?:Inc|Corp|Corporation|Co|Ltd|LLC|PLC|plc|Group|Holdings|Technologies|Motors|Bank|Capital|Partners|Fund|Trust)\b\.?",
    ))
    .expect("valid corporate regex")
});

static ROLE_PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:Mr|Mrs|Ms|Dr)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)",
        r"|\b(?:CEO|CFO|Chairman|Chairwoman|President|[Aa]nalyst|[Ff]ounder|[Cc]hief [Ee]xecutive)\s+([A-Z][a-z]+\s+[A-Z][a-z]+)",
    ))
    .expect("valid person regex")
});

/// Compiled-size cap for a gazetteer's combined alternation.
const GAZETTEER_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A case-insensitive list of names whose matches must be capitalized in the
/// text and bounded by non-alphanumeric characters.
///
/// Names compile into one alternation. When that exceeds the size limit the
/// gazetteer falls back to one pattern per name.
#[derive(Debug, Clone)]
struct Gazetteer {
    regexes: Vec<Regex>,
    label: EntityLabel,
}

impl Gazetteer {
    fn new<'a>(names: impl IntoIterator<Item = &'a str>, label: EntityLabel) -> Self {
        Self::with_size_limit(names, label, GAZETTEER_SIZE_LIMIT)
    }

    fn with_size_limit<'a>(
        names: impl IntoIterator<Item = &'a str>,
        label: EntityLabel,
        size_limit: usize,
    ) -> Self {
        let mut names: Vec<&str> = names
            .into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        // Longest first so alternation prefers "Berkshire Hathaway" over "Berkshire".
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        names.dedup();
        if names.is_empty() {
            return Self {
                regexes: Vec::new(),
                label,
            };
        }

        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        match RegexBuilder::new(&format!("(?:{alternation})"))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
        {
            Ok(regex) => Self {
                regexes: vec![regex],
                label,
            },
            Err(e) => {
                tracing::warn!(
                    label = %label,
                    names = names.len(),
                    error = %e,
                    "gazetteer too large for one pattern; matching names one by one"
                );
                let regexes = names
                    .iter()
                    .filter_map(|name| {
                        RegexBuilder::new(&regex::escape(name))
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| {
                                tracing::warn!(name, error = %e, "gazetteer name skipped");
                            })
                            .ok()
                    })
                    .collect();
                Self { regexes, label }
            }
        }
    }

    fn find(&self, text: &str, spans: &mut Vec<Span>) {
        for m in self.regexes.iter().flat_map(|regex| regex.find_iter(text)) {
            let capitalized = m
                .as_str()
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
            if capitalized && is_bounded(text, m.start(), m.end()) {
                spans.push(Span::new(m.start(), m.end(), self.label));
            }
        }
    }
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    label: EntityLabel,
}

impl Span {
    fn new(start: usize, end: usize, label: EntityLabel) -> Self {
        Self { start, end, label }
    }
}

/// Default [`EntityExtractor`]: deterministic rules, no model files.
#[derive(Debug, Clone)]
pub struct RuleEntityExtractor {
    organizations: Gazetteer,
    people: Gazetteer,
    places: Gazetteer,
}

impl Default for RuleEntityExtractor {
    fn default() -> Self {
        Self::with_organizations(std::iter::empty::<&str>())
    }
}

impl RuleEntityExtractor {
    /// Built-in gazetteers extended with extra organization names, typically
    /// every configured fund holding.
    #[must_use]
    pub fn with_organizations<'a>(extra: impl IntoIterator<Item = &'a str>) -> Self {
        let organizations = KNOWN_ORGANIZATIONS.iter().copied().chain(extra);
        Self {
            organizations: Gazetteer::new(organizations, EntityLabel::Organization),
            people: Gazetteer::new(KNOWN_PEOPLE.iter().copied(), EntityLabel::Person),
            places: Gazetteer::new(KNOWN_PLACES.iter().copied(), EntityLabel::Location),
        }
    }

    fn candidates(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for (re, label) in [
            (&*MONEY_RE, EntityLabel::Money),
            (&*PERCENT_RE, EntityLabel::Percent),
            (&*DATE_RE, EntityLabel::Date),
        ] {
            spans.extend(re.find_iter(text).map(|m| Span::new(m.start(), m.end(), label)));
        }

        for caps in ROLE_PERSON_RE.captures_iter(text) {
            if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
                spans.push(Span::new(name.start(), name.end(), EntityLabel::Person));
            }
        }
        self.people.find(text, &mut spans);

        for m in CORPORATE_RE.find_iter(text) {
            let start = if m.as_str().starts_with("The ") {
                m.start() + 4
            } else {
                m.start()
            };
            spans.push(Span::new(start, m.end(), EntityLabel::Organization));
        }
        self.organizations.find(text, &mut spans);
        self.places.find(text, &mut spans);

        spans
    }
}

impl EntityExtractor for RuleEntityExtractor {
    fn extract(&self, text: &str) -> Result<Vec<Entity>, EngineError> {
        let mut spans = self.candidates(text);
        // Stable: equal spans keep candidate order, which encodes label priority.
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut entities = Vec::new();
        let mut covered_to = 0;
        for span in spans {
            if span.start < covered_to {
                continue;
            }
            covered_to = span.end;
            entities.push(Entity::new(&text[span.start..span.end], span.label));
        }
        Ok(entities)
    }
}
