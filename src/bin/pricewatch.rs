//! pricewatch CLI — the transport shell over the tracker core.
//!
//! Usage:
//!   pricewatch scrape "a light in the attic"
//!   pricewatch summarize "a light in the attic"
//!   pricewatch history "a light in the attic" [--limit 10]

use clap::{Parser, Subcommand};
use pricewatch::{
    ChromiumBrowser, HttpGenerator, ScrapeReport, WatchApi, WatchConfig, HISTORY_WINDOW,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pricewatch", version, about = "Catalog price tracker")]
struct Cli {
    /// Directory holding the per-item ledger databases
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog listing page to scrape
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Emit results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the catalog for an item and record its current price
    Scrape {
        /// Item to search for
        query: String,
    },
    /// Explain the recent price trend for an item
    Summarize {
        /// Item to summarize
        query: String,
    },
    /// Show the recorded price history for an item
    History {
        /// Item to look up
        query: String,
        /// Maximum number of points to show
        #[arg(long, default_value_t = HISTORY_WINDOW)]
        limit: usize,
    },
}

fn build_api(cli: &Cli) -> WatchApi {
    let mut config = WatchConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.catalog_url {
        config.catalog_url = url.clone();
    }

    let mut generator = HttpGenerator::new(&config.generation_url, &config.generation_model);
    if let Some(key) = &config.api_key {
        generator = generator.with_api_key(key);
    }

    WatchApi::new(&config, Arc::new(ChromiumBrowser::new()), Arc::new(generator))
}

async fn cmd_scrape(api: &WatchApi, query: &str, json: bool) -> i32 {
    let result = api.scrape(query).await;

    if json {
        let report = ScrapeReport::from_result(&result);
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
        return if report.success { 0 } else { 1 };
    }

    match result {
        Ok(outcome) => {
            println!("{} — {}", outcome.found_title, outcome.raw_price);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_summarize(api: &WatchApi, query: &str, json: bool) -> i32 {
    match api.summarize(query).await {
        Ok(summary) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&summary).unwrap());
            } else {
                println!("{}", summary.response);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_history(api: &WatchApi, query: &str, limit: usize, json: bool) -> i32 {
    match api.recent(query, limit) {
        Ok(points) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&points).unwrap());
            } else if points.is_empty() {
                println!("No recorded history for '{}'", query);
            } else {
                for point in &points {
                    println!("{}\t{:.2}", point.observed_at, point.price);
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pricewatch=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = build_api(&cli);

    let code = match &cli.command {
        Commands::Scrape { query } => cmd_scrape(&api, query, cli.json).await,
        Commands::Summarize { query } => cmd_summarize(&api, query, cli.json).await,
        Commands::History { query, limit } => cmd_history(&api, query, *limit, cli.json),
    };

    std::process::exit(code);
}
