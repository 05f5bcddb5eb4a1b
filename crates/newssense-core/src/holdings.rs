use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The named holdings of one fund, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundHoldings {
    pub ticker: String,
    pub holdings: Vec<String>,
}

/// Fund ticker → holding names.
///
/// Stored as an ordered list rather than a map so match results follow the
/// order funds were declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdings {
    pub funds: Vec<FundHoldings>,
}

impl Holdings {
    /// Holdings used when no holdings file is present.
    #[must_use]
    pub fn builtin() -> Self {
        let fund = |ticker: &str, names: &[&str]| FundHoldings {
            ticker: ticker.to_string(),
            holdings: names.iter().map(ToString::to_string).collect(),
        };
        Self {
            funds: vec![
                fund("QQQ", &["Apple", "Amazon", "NVIDIA", "Tesla"]),
                fund("VTI", &["Berkshire", "Johnson & Johnson", "Microsoft"]),
                fund("SPY", &["Meta", "Alphabet", "ExxonMobil", "Pfizer"]),
            ],
        }
    }

    /// Look up a fund by ticker, ignoring ASCII case.
    #[must_use]
    pub fn fund(&self, ticker: &str) -> Option<&FundHoldings> {
        self.funds
            .iter()
            .find(|f| f.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Every holding name across all funds, first occurrence wins.
    #[must_use]
    pub fn all_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.funds
            .iter()
            .flat_map(|f| f.holdings.iter())
            .filter(|name| seen.insert(name.to_lowercase()))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}

/// Load and validate the holdings table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_holdings(path: &Path) -> Result<Holdings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::HoldingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let holdings: Holdings =
        serde_yaml::from_str(&content).map_err(ConfigError::HoldingsFileParse)?;

    validate_holdings(&holdings)?;

    Ok(holdings)
}

fn validate_holdings(holdings: &Holdings) -> Result<(), ConfigError> {
    let mut seen_tickers = HashSet::new();

    for fund in &holdings.funds {
        let ticker = fund.ticker.as_str();
        if ticker.is_empty()
            || ticker.len() > 5
            || !ticker.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(ConfigError::Validation(format!(
                "invalid ticker '{ticker}'; must be 1-5 uppercase letters"
            )));
        }

        if !seen_tickers.insert(ticker) {
            return Err(ConfigError::Validation(format!(
                "duplicate ticker: '{ticker}'"
            )));
        }

        if fund.holdings.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "fund '{ticker}' has an empty holding name"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn builtin_contains_default_funds() {
        let holdings = Holdings::builtin();
        let tickers: Vec<&str> = holdings.funds.iter().map(|f| f.ticker.as_str()).collect();
        assert_eq!(tickers, ["QQQ", "VTI", "SPY"]);
        assert!(holdings
            .fund("QQQ")
            .unwrap()
            .holdings
            .contains(&"Tesla".to_string()));
    }

    #[test]
    fn fund_lookup_is_case_insensitive() {
        let holdings = Holdings::builtin();
        assert_eq!(holdings.fund("vti").unwrap().ticker, "VTI");
        assert!(holdings.fund("ARKK").is_none());
    }

    #[test]
    fn all_names_deduplicates_case_insensitively() {
        let holdings = Holdings {
            funds: vec![
                FundHoldings {
                    ticker: "AAA".to_string(),
                    holdings: vec!["Apple".to_string(), "Tesla".to_string()],
                },
                FundHoldings {
                    ticker: "BBB".to_string(),
                    holdings: vec!["apple".to_string(), "Pfizer".to_string()],
                },
            ],
        };
        assert_eq!(holdings.all_names(), ["Apple", "Tesla", "Pfizer"]);
    }

    #[test]
    fn load_holdings_reads_valid_file() {
        let file = write_yaml(
            "funds:\n  - ticker: QQQ\n    holdings: [Apple, Tesla]\n  - ticker: ARKK\n    holdings: [Roku]\n",
        );
        let holdings = load_holdings(file.path()).unwrap();
        assert_eq!(holdings.funds.len(), 2);
        assert_eq!(holdings.funds[1].ticker, "ARKK");
        assert_eq!(holdings.funds[1].holdings, ["Roku"]);
    }

    #[test]
    fn load_holdings_missing_file_is_io_error() {
        let err = load_holdings(Path::new("/nonexistent/holdings.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::HoldingsFileIo { .. }));
    }

    #[test]
    fn load_holdings_rejects_malformed_yaml() {
        let file = write_yaml("funds: [ticker: QQQ");
        let err = load_holdings(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::HoldingsFileParse(_)));
    }

    #[test]
    fn load_holdings_rejects_duplicate_ticker() {
        let file = write_yaml(
            "funds:\n  - ticker: QQQ\n    holdings: [Apple]\n  - ticker: QQQ\n    holdings: [Tesla]\n",
        );
        let err = load_holdings(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
    }

    #[test]
    fn load_holdings_rejects_lowercase_ticker() {
        let file = write_yaml("funds:\n  - ticker: qqq\n    holdings: [Apple]\n");
        let err = load_holdings(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn load_holdings_rejects_blank_holding() {
        let file = write_yaml("funds:\n  - ticker: QQQ\n    holdings: [Apple, \"  \"]\n");
        let err = load_holdings(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("empty holding")));
    }
}
