//! Text normalization: markup stripping, tokenization, stop-word removal.

use std::sync::LazyLock;

use newssense_core::Article;
use regex::Regex;

use crate::stopwords::is_stop_word;
use crate::types::NormalizedDocument;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Words (with inner apostrophes, hyphens, dots or ampersands, e.g. "U.S",
/// "S&P", "year-over-year") or single non-space symbols.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’.\-&][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("valid token regex")
});

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    // Last, so "&amp;lt;" decodes to "&lt;" rather than "<".
    ("&amp;", "&"),
];

/// Remove every `<...>` span and decode the common character entities.
///
/// Tags become a single space so adjacent block elements do not fuse words.
/// A lone `<` without a closing `>` is left as literal text.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let mut out = TAG_RE.replace_all(text, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// Strip markup and collapse whitespace, keeping original casing.
#[must_use]
pub fn clean_text(text: &str) -> String {
    strip_markup(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into word and symbol tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

fn is_punctuation(token: &str) -> bool {
    !token.chars().any(char::is_alphanumeric)
}

/// Lower-case tokens of already-cleaned text, minus punctuation and stop-words.
fn content_tokens(clean: &str) -> Vec<String> {
    tokenize(clean)
        .into_iter()
        .filter(|t| !is_punctuation(t))
        .map(str::to_lowercase)
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// Normalize arbitrary text (article body or query) to the embedding form.
///
/// Returns an empty string when nothing but stop-words and punctuation remain.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    content_tokens(&clean_text(text)).join(" ")
}

/// Normalize one article of a batch.
///
/// Title and summary are joined as `"{title}. {summary}"`; an empty side is
/// left out rather than producing a dangling separator.
#[must_use]
pub fn normalize(index: usize, article: &Article) -> NormalizedDocument {
    let title = clean_text(&article.title);
    let summary = clean_text(&article.summary);
    let plain = match (title.is_empty(), summary.is_empty()) {
        (false, false) => format!("{title}. {summary}"),
        (false, true) => title,
        (true, _) => summary,
    };
    let text = content_tokens(&plain).join(" ");

    NormalizedDocument {
        source_article_index: index,
        text,
        plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let out = clean_text("<p>Johnson &amp; Johnson</p><b>beats</b> estimates");
        assert_eq!(out, "Johnson & Johnson beats estimates");
    }

    #[test]
    fn unmatched_angle_bracket_is_kept_as_text() {
        let out = clean_text("Revenue <b>beat</b> but margin < forecast");
        assert_eq!(out, "Revenue beat but margin < forecast");
    }

    #[test]
    fn double_encoded_entity_decodes_once() {
        assert_eq!(strip_markup("&amp;lt;"), "&lt;");
    }

    #[test]
    fn tokenize_keeps_inner_punctuation_words() {
        let tokens = tokenize("S&P 500 fell 2.5% in the U.S. today.");
        assert_eq!(
            tokens,
            ["S&P", "500", "fell", "2.5", "%", "in", "the", "U.S", ".", "today", "."]
        );
    }

    #[test]
    fn normalize_text_drops_stop_words_and_punctuation() {
        assert_eq!(normalize_text("Why is QQQ down?"), "qqq down");
    }

    #[test]
    fn only_stop_words_yields_empty_string() {
        assert_eq!(normalize_text("<i>The</i> and, of... it!"), "");
    }

    #[test]
    fn normalize_joins_title_and_summary() {
        let article = Article::new(
            "Tesla misses earnings",
            "https://example.com/tsla",
            "<p>Tesla Inc reported a 5% drop.</p>",
        );
        let doc = normalize(2, &article);
        assert_eq!(doc.source_article_index, 2);
        assert_eq!(doc.plain, "Tesla misses earnings. Tesla Inc reported a 5% drop.");
        assert_eq!(doc.text, "tesla misses earnings tesla inc reported 5 drop");
    }

    #[test]
    fn normalize_with_missing_summary_uses_title_only() {
        let article = Article::new("Nasdaq slides", "", "");
        let doc = normalize(0, &article);
        assert_eq!(doc.plain, "Nasdaq slides");
        assert_eq!(doc.text, "nasdaq slides");
    }

    #[test]
    fn normalize_is_deterministic() {
        let article = Article::new("A <b>title</b>", "l", "Some summary &amp; more");
        assert_eq!(normalize(0, &article), normalize(0, &article));
    }
}
