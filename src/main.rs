use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendwatch::config::Config;
use trendwatch::sources::BinanceFuturesClient;
use trendwatch::{AnalysisService, AppError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full multi-timeframe analysis with risk, recommendation and levels
    Analyze { symbol: String },
    /// 15m trend and open interest
    Quick { symbol: String },
    /// Latest 5m price and change
    Price { symbol: String },
    /// Search listed USD-quoted markets
    Search { query: String },
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn to_json<T: Serialize>(value: T) -> trendwatch::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    debug!("Using Binance futures API at {}", config.binance_futures_url);

    let source = Arc::new(BinanceFuturesClient::new(&config));
    let service = AnalysisService::new(source, config);

    let (input, result) = match &cli.command {
        Command::Search { query } => {
            let found = service.search_symbols(query).await?;
            info!("{} markets match '{}'", found.len(), query);
            return print_json(&found, cli.pretty);
        }
        Command::Analyze { symbol } => (
            symbol,
            service.analyze_symbol(symbol).await.and_then(to_json),
        ),
        Command::Quick { symbol } => (
            symbol,
            service.quick_analysis(symbol).await.and_then(to_json),
        ),
        Command::Price { symbol } => (
            symbol,
            service.price_snapshot(symbol).await.and_then(to_json),
        ),
    };

    match result {
        Ok(value) => print_json(&value, cli.pretty),
        Err(AppError::NotFound(message)) => {
            let suggestions = service.suggestions(input).await;
            print_json(
                &serde_json::json!({
                    "error": message,
                    "suggestions": suggestions,
                }),
                cli.pretty,
            )?;
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
