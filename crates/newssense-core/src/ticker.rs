//! Ticker-hint extraction from a free-text question.

/// Uppercase words that look like tickers but almost never are.
const NOT_TICKERS: &[&str] = &[
    "AI", "CEO", "CFO", "ETF", "EPS", "GDP", "IPO", "US", "USA", "USD", "UK", "EU", "FED", "SEC",
    "WHY", "WHAT", "HOW", "IS", "THE",
];

/// Returns the first standalone run of 2–5 ASCII uppercase letters.
///
/// A run counts as standalone when the characters on either side are not
/// alphanumeric, so "QQQ?" yields `QQQ` while "QQQM2" yields nothing.
/// Common uppercase abbreviations are skipped. Returns `None` if no
/// candidate is found.
#[must_use]
pub fn parse_ticker(query: &str) -> Option<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| (2..=5).contains(&word.len()))
        .filter(|word| word.chars().all(|c| c.is_ascii_uppercase()))
        .find(|word| !NOT_TICKERS.contains(word))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ticker_in_question() {
        assert_eq!(parse_ticker("Why is QQQ down?"), Some("QQQ".to_string()));
    }

    #[test]
    fn finds_first_of_several() {
        assert_eq!(
            parse_ticker("What news affected SPY and VTI today"),
            Some("SPY".to_string())
        );
    }

    #[test]
    fn ignores_single_letters_and_long_runs() {
        assert_eq!(parse_ticker("I think A is ABCDEFG"), None);
    }

    #[test]
    fn ignores_mixed_case_and_alphanumeric_runs() {
        assert_eq!(parse_ticker("Why is Qqq down after QQQM2"), None);
    }

    #[test]
    fn skips_common_abbreviations() {
        assert_eq!(
            parse_ticker("WHY did the CEO say ARKK fell"),
            Some("ARKK".to_string())
        );
    }

    #[test]
    fn empty_query_has_no_ticker() {
        assert_eq!(parse_ticker(""), None);
    }
}
