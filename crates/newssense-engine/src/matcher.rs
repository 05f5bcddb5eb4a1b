//! Fund-holding mention detection.

use newssense_core::{Holdings, MatchMode};

/// Funds with at least one holding named in `text`, in holdings order.
///
/// Matching is case-insensitive. Each fund is reported once, on its first
/// matching holding.
#[must_use]
pub fn match_funds(text: &str, holdings: &Holdings, mode: MatchMode) -> Vec<String> {
    let haystack = text.to_lowercase();
    holdings
        .funds
        .iter()
        .filter(|fund| fund.holdings.iter().any(|h| contains(&haystack, h, mode)))
        .map(|fund| fund.ticker.clone())
        .collect()
}

/// Names of `ticker`'s holdings that appear in `text`, in holdings order.
///
/// Returns an empty list when the ticker is not a known fund.
#[must_use]
pub fn match_holdings(
    text: &str,
    ticker: &str,
    holdings: &Holdings,
    mode: MatchMode,
) -> Vec<String> {
    let Some(fund) = holdings.fund(ticker) else {
        return Vec::new();
    };
    let haystack = text.to_lowercase();
    fund.holdings
        .iter()
        .filter(|h| contains(&haystack, h, mode))
        .cloned()
        .collect()
}

/// `haystack` must already be lower-cased.
fn contains(haystack: &str, holding: &str, mode: MatchMode) -> bool {
    let needle = holding.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => haystack.contains(&needle),
        MatchMode::WordBoundary => haystack.match_indices(&needle).any(|(start, m)| {
            let end = start + m.len();
            let before = haystack[..start].chars().next_back();
            let after = haystack[end..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }),
    }
}

#[cfg(test)]
mod tests {
    use newssense_core::FundHoldings;

    use super::*;

    fn qqq_only() -> Holdings {
        Holdings {
            funds: vec![FundHoldings {
                ticker: "QQQ".to_string(),
                holdings: ["Apple", "Amazon", "NVIDIA", "Tesla"]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            }],
        }
    }

    #[test]
    fn tesla_mention_matches_qqq() {
        let funds = match_funds("tesla misses earnings", &qqq_only(), MatchMode::Substring);
        assert_eq!(funds, ["QQQ"]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let funds = match_funds("NVIDIA and nvidia and Nvidia", &qqq_only(), MatchMode::Substring);
        assert_eq!(funds, ["QQQ"]);
    }

    #[test]
    fn fund_is_reported_once() {
        let funds = match_funds("Apple, Amazon and Tesla", &qqq_only(), MatchMode::Substring);
        assert_eq!(funds, ["QQQ"]);
    }

    #[test]
    fn funds_follow_holdings_order() {
        let funds = match_funds(
            "Pfizer and Microsoft and Tesla rose",
            &Holdings::builtin(),
            MatchMode::Substring,
        );
        assert_eq!(funds, ["QQQ", "VTI", "SPY"]);
    }

    #[test]
    fn no_mentions_yield_no_funds() {
        assert!(match_funds("bond yields rose", &Holdings::builtin(), MatchMode::Substring).is_empty());
    }

    #[test]
    fn substring_mode_matches_inside_words() {
        let funds = match_funds("the metaverse hype", &Holdings::builtin(), MatchMode::Substring);
        assert_eq!(funds, ["SPY"]);
    }

    #[test]
    fn word_boundary_mode_rejects_inside_words() {
        let holdings = Holdings::builtin();
        assert!(match_funds("the metaverse hype", &holdings, MatchMode::WordBoundary).is_empty());
        assert_eq!(
            match_funds("meta's outlook", &holdings, MatchMode::WordBoundary),
            ["SPY"]
        );
    }

    #[test]
    fn punctuated_holding_names_match() {
        let funds = match_funds(
            "Johnson & Johnson recalls talc",
            &Holdings::builtin(),
            MatchMode::WordBoundary,
        );
        assert_eq!(funds, ["VTI"]);
    }

    #[test]
    fn match_holdings_lists_every_named_holding() {
        let names = match_holdings(
            "Apple and Tesla slid while Amazon held",
            "qqq",
            &qqq_only(),
            MatchMode::Substring,
        );
        assert_eq!(names, ["Apple", "Amazon", "Tesla"]);
    }

    #[test]
    fn match_holdings_unknown_ticker_is_empty() {
        assert!(match_holdings("Tesla", "ARKK", &qqq_only(), MatchMode::Substring).is_empty());
    }

    #[test]
    fn empty_holdings_never_match() {
        assert!(match_funds("anything", &Holdings::default(), MatchMode::Substring).is_empty());
    }
}
