// Command-line front end for the stock news extraction pipeline.
//
// Runs one search per invocation and prints the records as pretty JSON.
// Ctrl-C cancels the in-flight search; the browser is still torn down.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use kodegen_tools_stocknews::{
    Deadline, FailurePolicy, FetchConfig, KeywordArgs, NO_RESULTS_MESSAGE, NoAnalysis,
    StockNewsTools,
};

#[derive(Debug, Parser)]
#[command(name = "kodegen-stocknews", version, about = "Fetch stock news and stock pages through a headless browser")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: FetchOptions,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the Cailian Press telegram channel
    News { keyword: String },
    /// Search xueqiu and fetch every matching stock page
    Stocks { keyword: String },
}

#[derive(Debug, Args)]
struct FetchOptions {
    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Chrome/Chromium executable to launch
    #[arg(long, global = true, value_name = "PATH", env = "CHROMIUM_PATH")]
    chrome: Option<PathBuf>,

    /// Per-page timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    page_timeout: Option<u64>,

    /// Emit an empty record for targets that fail instead of omitting them
    #[arg(long, global = true)]
    placeholder_on_failure: bool,

    /// Fetch at most this many resolved targets
    #[arg(long, global = true, value_name = "N")]
    max_targets: Option<usize>,
}

impl FetchOptions {
    fn to_config(&self) -> Result<FetchConfig> {
        let mut builder = FetchConfig::builder()
            .headless(!self.headed)
            .chrome_executable(self.chrome.clone())
            .max_targets(self.max_targets);

        if let Some(secs) = self.page_timeout {
            builder = builder.page_timeout(Duration::from_secs(secs));
        }
        if self.placeholder_on_failure {
            builder = builder.failure_policy(FailurePolicy::Placeholder);
        }

        Ok(builder.build()?)
    }
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = cli.options.to_config()?;
    let deadline = Deadline::after(config.session_timeout());
    let tools = StockNewsTools::new(config, NoAnalysis);

    let canceller = deadline.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling search");
            canceller.cancel();
        }
    });

    let records = match cli.command {
        Command::News { keyword } => {
            tools
                .search_stock_news(KeywordArgs { keyword }, &deadline)
                .await?
        }
        Command::Stocks { keyword } => {
            tools
                .search_stock_pages(KeywordArgs { keyword }, &deadline)
                .await?
        }
    };

    if records.is_empty() {
        println!("{NO_RESULTS_MESSAGE}");
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}
