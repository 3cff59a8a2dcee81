//! The Run Supervisor: spawns the worker pool, applies the stop condition,
//! and emits the post-run metrics summary.

use crate::crawler::worker::Worker;
use crate::kv::{Frontier, Visited};
use crate::storage::Storage;
use crate::Config;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const MONITOR_POLL: Duration = Duration::from_millis(200);
const METRICS_ROBOTS_BLOCKED_KEY: &str = "metrics:robots_blocked";

#[derive(Debug, Serialize)]
pub struct MetricsSummary {
    pub pages_crawled: u64,
    pub duration_seconds: f64,
    pub pages_per_second: f64,
    pub start_ts: f64,
    pub end_ts: f64,
    pub status_counts: HashMap<String, u64>,
    pub robots_blocked: u64,
}

/// Seeds `urls` into the frontier. Used by both the `seed` subcommand and
/// `run`'s optional seeding from configuration.
pub async fn seed(frontier: &Frontier, urls: &[String]) -> crate::Result<()> {
    frontier.push_many(urls, None).await?;
    Ok(())
}

/// Runs the worker pool until `max_pages` additional pages have been
/// crawled (if given) or the process is otherwise interrupted, then writes
/// `output/metrics.json` and returns the summary.
///
/// Each spawned worker builds its own HTTP client: the session and its
/// connection pool are per-worker, never shared, per `SPEC_FULL.md` §5.
pub async fn run(
    config: Arc<Config>,
    redis: ConnectionManager,
    storage: Arc<dyn Storage + Send + Sync>,
    concurrency: usize,
    max_pages: Option<u64>,
) -> crate::Result<MetricsSummary> {
    storage.init().await?;

    let mut metrics_conn = redis.clone();
    let _: () = metrics_conn.set(METRICS_ROBOTS_BLOCKED_KEY, 0).await?;

    if !config.seed_urls.is_empty() {
        let frontier = Frontier::new(redis.clone());
        seed(&frontier, &config.seed_urls).await?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::with_capacity(concurrency.max(1));
    for _ in 0..concurrency.max(1) {
        let http = build_worker_client(&config)?;
        let worker = Worker::new(config.clone(), http, redis.clone(), storage.clone());
        let stop = stop.clone();
        handles.push(tokio::spawn(async move { worker.run(stop).await }));
    }

    let start_ts = now_unix();
    let visited = Visited::new(redis.clone());
    let start_visited = visited.count().await?;

    let monitor = {
        let stop = stop.clone();
        let visited = visited.clone();
        tokio::spawn(async move {
            let Some(max_pages) = max_pages else { return };
            let target = start_visited + max_pages;
            loop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                match visited.count().await {
                    Ok(current) if current >= target => {
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "monitor visited-count check failed"),
                }
                tokio::time::sleep(MONITOR_POLL).await;
            }
        })
    };

    let signal_watch = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received, stopping worker pool");
                stop.store(true, Ordering::Relaxed);
            }
        })
    };

    for handle in handles {
        let _ = handle.await;
    }
    monitor.abort();
    signal_watch.abort();

    let end_ts = now_unix();
    let end_visited = visited.count().await?;
    let pages_crawled = end_visited.saturating_sub(start_visited);
    let duration = (end_ts - start_ts).max(1e-6);
    let pages_per_second = pages_crawled as f64 / duration;

    let status_counts = storage.aggregate_status_since(start_ts).await?;
    let robots_blocked: u64 = metrics_conn.get(METRICS_ROBOTS_BLOCKED_KEY).await.unwrap_or(0);

    Ok(MetricsSummary {
        pages_crawled,
        duration_seconds: duration,
        pages_per_second,
        start_ts,
        end_ts,
        status_counts,
        robots_blocked,
    })
}

/// Builds one worker's HTTP client: a connection pool capped at the
/// configured concurrency, matching the source implementation's
/// per-session `TCPConnector(limit=concurrency)`.
fn build_worker_client(config: &Config) -> crate::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .pool_max_idle_per_host(config.concurrency)
        .build()?)
}

fn now_unix() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}
