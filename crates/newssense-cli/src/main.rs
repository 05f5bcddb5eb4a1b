use clap::{Parser, Subcommand};
use newssense_core::{load_holdings, AppConfig, Holdings};
use tracing_subscriber::EnvFilter;

mod analyze;
mod fetch;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "newssense-cli")]
#[command(about = "Explain fund moves from recent news")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank stored news against a question and report fund impact
    Analyze {
        /// Fund ticker (e.g. QQQ); parsed from the query when omitted
        #[arg(long)]
        ticker: Option<String>,
        /// Free-text question (defaults to "Why is <TICKER> down?")
        #[arg(long)]
        query: Option<String>,
        /// Fetch fresh news before analyzing
        #[arg(long)]
        fetch: bool,
        /// Number of articles to report
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        top_k: Option<u16>,
        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Fetch news for a ticker and store it on disk
    Fetch {
        /// Fund ticker (e.g. QQQ)
        #[arg(long)]
        ticker: String,
        /// Extra search keyword; repeatable
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// List the configured funds and their holdings
    Holdings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = newssense_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze {
            ticker,
            query,
            fetch,
            top_k,
            json,
        }) => {
            let options = analyze::AnalyzeOptions {
                ticker,
                query,
                fetch,
                top_k: top_k.map(usize::from),
                json,
            };
            analyze::run_analyze(&config, options).await?;
        }
        Some(Commands::Fetch { ticker, keywords }) => {
            fetch::run_fetch(&config, &ticker, &keywords).await?;
        }
        Some(Commands::Holdings) => {
            let holdings = load_holdings_or_builtin(&config)?;
            print!("{}", render_holdings(&holdings));
        }
        None => println!("newssense-cli: run `analyze`, `fetch` or `holdings` (see --help)"),
    }

    Ok(())
}

/// Holdings from the configured file, or the built-in table when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or fails validation.
pub(crate) fn load_holdings_or_builtin(config: &AppConfig) -> anyhow::Result<Holdings> {
    if config.holdings_path.exists() {
        Ok(load_holdings(&config.holdings_path)?)
    } else {
        tracing::warn!(
            path = %config.holdings_path.display(),
            "holdings file not found; using built-in holdings"
        );
        Ok(Holdings::builtin())
    }
}

fn render_holdings(holdings: &Holdings) -> String {
    if holdings.is_empty() {
        return "no funds configured\n".to_string();
    }
    let mut out = format!("{:<8}HOLDINGS\n", "FUND");
    for fund in &holdings.funds {
        out.push_str(&format!("{:<8}{}\n", fund.ticker, fund.holdings.join(", ")));
    }
    out
}
