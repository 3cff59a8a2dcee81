//! Driftline: a horizontally scalable, politeness-respecting web crawler.
//!
//! Command-line entry point. Every subcommand builds its own Redis and
//! Mongo clients, performs its operation, and returns a process exit code.

use clap::{Parser, Subcommand};
use driftline::config::load_config;
use driftline::crawler::supervisor;
use driftline::kv::{Frontier, Visited};
use driftline::output;
use driftline::storage::{MongoStorage, Storage};
use driftline::Config;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "driftline")]
#[command(version = "1.0.0")]
#[command(about = "A horizontally scalable, politeness-respecting web crawler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push one or more URLs onto the frontier
    Seed {
        /// URLs to seed
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show frontier, visited, and page counts
    Stats,
    /// Run the worker pool until the stop condition is met
    Run {
        /// Worker count; defaults to the CONCURRENCY configuration value
        #[arg(long)]
        concurrency: Option<usize>,
        /// Stop after crawling approximately this many additional pages
        #[arg(long)]
        max_pages: Option<u64>,
    },
    /// Write a status snapshot to output/status.json and output/dashboard.html
    DumpStatus,
    /// Show the top domains in the frontier, visited set, and stored pages
    DomainStats {
        #[arg(long, default_value_t = 15)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Command::Seed { urls } => run_seed(&config, urls).await,
        Command::Stats => run_stats(&config).await,
        Command::Run { concurrency, max_pages } => run_crawl(config, concurrency, max_pages).await,
        Command::DumpStatus => run_dump_status(&config).await,
        Command::DomainStats { limit, json } => run_domain_stats(&config, limit, json).await,
    };

    if let Err(e) = &result {
        tracing::error!("{e}");
    }
    result.map_err(Into::into)
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("driftline=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn redis_connection(config: &Config) -> driftline::Result<ConnectionManager> {
    let client = redis::Client::open(config.redis_url.clone())?;
    Ok(ConnectionManager::new(client).await?)
}

async fn storage(config: &Config) -> driftline::Result<Arc<dyn Storage + Send + Sync>> {
    let storage = MongoStorage::connect(&config.mongo_url, &config.mongo_db).await?;
    Ok(Arc::new(storage))
}

async fn run_seed(config: &Config, urls: Vec<String>) -> driftline::Result<()> {
    let conn = redis_connection(config).await?;
    let frontier = Frontier::new(conn);
    supervisor::seed(&frontier, &urls).await?;
    println!("Seeded {} URLs", urls.len());
    Ok(())
}

async fn run_stats(config: &Config) -> driftline::Result<()> {
    let conn = redis_connection(config).await?;
    let storage = storage(config).await?;
    storage.init().await?;
    let frontier = Frontier::new(conn.clone());
    let visited = Visited::new(conn);
    let stats = output::load_stats(&frontier, &visited, storage.as_ref()).await?;
    output::print_stats(&stats);
    Ok(())
}

async fn run_crawl(config: Config, concurrency: Option<usize>, max_pages: Option<u64>) -> driftline::Result<()> {
    let config = Arc::new(config);
    let conn = redis_connection(&config).await?;
    let storage = storage(&config).await?;

    let concurrency = concurrency.unwrap_or(config.concurrency);
    let summary = supervisor::run(config, conn, storage, concurrency, max_pages).await?;
    output::write_metrics(&summary)?;

    println!(
        "Run complete: pages={}, pps={:.2}. Metrics at output/metrics.json.",
        summary.pages_crawled, summary.pages_per_second
    );
    Ok(())
}

async fn run_dump_status(config: &Config) -> driftline::Result<()> {
    let conn = redis_connection(config).await?;
    let storage = storage(config).await?;
    storage.init().await?;
    let frontier = Frontier::new(conn.clone());
    let visited = Visited::new(conn);
    let snapshot = output::load_status(&frontier, &visited, storage.as_ref()).await?;
    output::write_status(&snapshot)?;
    println!("Status written: output/status.json, output/dashboard.html");
    Ok(())
}

async fn run_domain_stats(config: &Config, limit: usize, json: bool) -> driftline::Result<()> {
    let conn = redis_connection(config).await?;
    let storage = storage(config).await?;
    storage.init().await?;
    let stats = output::load_domain_stats(&conn, storage.as_ref(), limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        output::print_table("Frontier Domains", &stats.frontier);
        output::print_table("Visited Domains", &stats.visited);
        output::print_table("Stored Domains", &stats.stored);
    }
    Ok(())
}
