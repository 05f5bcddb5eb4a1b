use chrono::{TimeZone, Utc};
use newssense_core::FundHoldings;
use newssense_engine::{AnalysisResult, Entity, EntityLabel};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["newssense-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analyze_defaults() {
    let cli = Cli::try_parse_from(["newssense-cli", "analyze"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            ticker: None,
            query: None,
            fetch: false,
            top_k: None,
            json: false
        })
    ));
}

#[test]
fn parses_analyze_with_all_flags() {
    let cli = Cli::try_parse_from([
        "newssense-cli",
        "analyze",
        "--ticker",
        "QQQ",
        "--query",
        "Why did QQQ drop?",
        "--fetch",
        "--top-k",
        "5",
        "--json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            ticker: Some(ref t),
            query: Some(ref q),
            fetch: true,
            top_k: Some(5),
            json: true
        }) if t == "QQQ" && q == "Why did QQQ drop?"
    ));
}

#[test]
fn analyze_rejects_zero_top_k() {
    assert!(Cli::try_parse_from(["newssense-cli", "analyze", "--top-k", "0"]).is_err());
}

#[test]
fn parses_fetch_with_repeated_keywords() {
    let cli = Cli::try_parse_from([
        "newssense-cli",
        "fetch",
        "--ticker",
        "SPY",
        "--keyword",
        "stock",
        "--keyword",
        "market",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Fetch { ticker, keywords }) => {
            assert_eq!(ticker, "SPY");
            assert_eq!(keywords, ["stock", "market"]);
        }
        other => panic!("expected fetch command, got {other:?}"),
    }
}

#[test]
fn fetch_requires_ticker() {
    assert!(Cli::try_parse_from(["newssense-cli", "fetch"]).is_err());
}

#[test]
fn parses_holdings_command() {
    let cli = Cli::try_parse_from(["newssense-cli", "holdings"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Holdings)));
}

#[test]
fn explicit_ticker_wins_over_query() {
    let ticker = analyze::resolve_ticker(Some("qqq"), Some("Why is SPY down?")).unwrap();
    assert_eq!(ticker, "QQQ");
}

#[test]
fn ticker_falls_back_to_query() {
    let ticker = analyze::resolve_ticker(None, Some("Why is VTI down?")).unwrap();
    assert_eq!(ticker, "VTI");
}

#[test]
fn missing_ticker_is_an_error() {
    assert!(analyze::resolve_ticker(None, Some("why are markets down?")).is_err());
    assert!(analyze::resolve_ticker(Some("  "), None).is_err());
}

#[test]
fn default_query_names_the_ticker() {
    assert_eq!(analyze::default_query("QQQ"), "Why is QQQ down?");
}

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        original_title: "Tesla misses earnings".to_string(),
        link: "https://news.example.com/tesla".to_string(),
        distance: 0.5,
        summary: "Tesla Inc reported a 5% drop.".to_string(),
        sentiment: -0.456,
        entities: vec![
            Entity::new("Tesla", EntityLabel::Organization),
            Entity::new("5%", EntityLabel::Percent),
        ],
        matched_funds: vec!["QQQ".to_string()],
        matched_holdings: vec!["Tesla".to_string()],
    }
}

#[test]
fn report_lists_ranked_results() {
    let generated = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
    let report =
        analyze::render_report("QQQ", "Why is QQQ down?", &[sample_result()], generated);

    assert!(report.starts_with("# News Impact Report: QQQ\n"));
    assert!(report.contains("**Generated**: 2025-07-18 09:30 UTC"));
    assert!(report.contains("## 1. Tesla misses earnings"));
    assert!(report.contains("- **Sentiment**: -0.46"));
    assert!(report.contains("- **Entities**: Tesla (ORG), 5% (PERCENT)"));
    assert!(report.contains("- **Matched funds**: QQQ"));
    assert!(report.contains("- **Matched QQQ holdings**: Tesla"));
    assert!(report.contains("> Tesla Inc reported a 5% drop."));
}

#[test]
fn empty_report_says_so() {
    let generated = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
    let report = analyze::render_report("SPY", "Why is SPY down?", &[], generated);
    assert!(report.contains("**Articles**: 0"));
    assert!(report.contains("No relevant articles found."));
}

#[test]
fn results_serialize_with_label_strings() {
    let json = serde_json::to_value(sample_result()).unwrap();
    assert_eq!(json["entities"][0]["label"], "ORG");
    assert_eq!(json["matched_funds"][0], "QQQ");
}

#[test]
fn holdings_table_lists_each_fund() {
    let holdings = Holdings {
        funds: vec![FundHoldings {
            ticker: "QQQ".to_string(),
            holdings: vec!["Apple".to_string(), "Tesla".to_string()],
        }],
    };
    let table = render_holdings(&holdings);
    assert_eq!(table, "FUND    HOLDINGS\nQQQ     Apple, Tesla\n");
}

#[test]
fn empty_holdings_table() {
    assert_eq!(render_holdings(&Holdings::default()), "no funds configured\n");
}
