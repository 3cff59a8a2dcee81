//! A single worker's fetch-parse-enqueue cycle.
//!
//! Workers are stateless: every fact they need to coordinate with their
//! siblings lives in the shared KV store ([`crate::kv`]) or the page store
//! ([`crate::storage`]). A worker never shares in-process state with
//! another worker, so any number of them may run, in one process or many.

use crate::crawler::{fetcher, parser};
use crate::kv::{Frontier, RateLimiter, Visited};
use crate::robots::{self, RobotsCache};
use crate::storage::Storage;
use crate::Config;
use redis::aio::ConnectionManager;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const IDLE_SLEEP: Duration = Duration::from_millis(100);
const METRICS_ROBOTS_BLOCKED_KEY: &str = "metrics:robots_blocked";

/// One worker's view of the shared coordination and storage handles.
pub struct Worker {
    config: Arc<Config>,
    http: reqwest::Client,
    redis: ConnectionManager,
    frontier: Frontier,
    visited: Visited,
    rate_limiter: RateLimiter,
    robots_cache: RobotsCache,
    storage: Arc<dyn Storage + Send + Sync>,
}

impl Worker {
    pub fn new(
        config: Arc<Config>,
        http: reqwest::Client,
        redis: ConnectionManager,
        storage: Arc<dyn Storage + Send + Sync>,
    ) -> Self {
        Self {
            frontier: Frontier::new(redis.clone()),
            visited: Visited::new(redis.clone()),
            rate_limiter: RateLimiter::new(redis.clone()),
            robots_cache: RobotsCache::new(redis.clone()),
            redis,
            config,
            http,
            storage,
        }
    }

    /// Runs until `stop` is set, sleeping briefly whenever the frontier has
    /// nothing ready.
    pub async fn run(&self, stop: Arc<AtomicBool>) {
        while !stop.load(Ordering::Relaxed) {
            let worked = self.process_one().await;
            if !worked {
                tokio::time::sleep(IDLE_SLEEP).await;
            }
        }
    }

    /// Claims and processes one URL. Returns `false` only when the frontier
    /// had nothing ready to claim.
    pub async fn process_one(&self) -> bool {
        let claimed = match self.frontier.pop_ready(1).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(error = %e, "frontier claim failed");
                return false;
            }
        };
        let Some(url) = claimed.into_iter().next() else {
            return false;
        };

        if let Err(e) = self.process_url(&url).await {
            tracing::warn!(url = %url, error = %e, "dropping url after error");
        }
        true
    }

    async fn process_url(&self, url: &str) -> crate::Result<()> {
        if self.visited.is_visited(url).await? {
            return Ok(());
        }

        let Ok(parsed) = url::Url::parse(url) else {
            self.visited.mark_visited(url, None).await?;
            return Ok(());
        };

        let parsed_robots = robots::fetch_robots(&self.http, &self.robots_cache, &parsed).await;
        if !robots::is_allowed(&parsed_robots, url, &self.config.user_agent) {
            tracing::debug!(url = %url, "blocked by robots.txt");
            let mut conn = self.redis.clone();
            let _: redis::RedisResult<()> = redis::cmd("INCR").arg(METRICS_ROBOTS_BLOCKED_KEY).query_async(&mut conn).await;
            self.visited.mark_visited(url, None).await?;
            return Ok(());
        }

        let domain = parsed.host_str().unwrap_or_default().to_lowercase();
        let (allowed_at, reserved) = self
            .rate_limiter
            .check_and_reserve(&domain, self.config.domain_cooldown_seconds)
            .await?;
        if !reserved {
            tracing::debug!(url = %url, domain = %domain, allowed_at, "deferred by rate limiter");
            self.frontier.push(url, Some(allowed_at)).await?;
            return Ok(());
        }

        let outcome = fetcher::fetch(
            &self.http,
            url,
            Duration::from_secs(self.config.request_timeout_seconds),
            self.config.max_content_size_bytes,
        )
        .await;

        let ts = now_unix();
        let (status, content_type, html) = match &outcome {
            fetcher::FetchOutcome::TransportFailure => (0u16, None, None),
            fetcher::FetchOutcome::NonHtml { status, content_type } => (*status, content_type.clone(), None),
            fetcher::FetchOutcome::Oversized { status, content_type } => (*status, content_type.clone(), None),
            fetcher::FetchOutcome::Ok { status, content_type, body } => (*status, content_type.clone(), Some(body.clone())),
        };

        let (title, links) = match &html {
            Some(body) => {
                let allowed: Option<HashSet<String>> = self.config.allowed_domains.clone();
                parser::extract(url, body, allowed.as_ref())
            }
            None => (String::new(), Vec::new()),
        };

        self.storage
            .save_page(
                url,
                &title,
                html.as_deref().unwrap_or(""),
                &links,
                &domain,
                ts,
                status,
                content_type.as_deref(),
            )
            .await?;

        self.visited.mark_visited(url, Some(ts)).await?;

        if !links.is_empty() {
            let flags = self.visited.has_many(&links).await?;
            let to_add: Vec<String> = links
                .into_iter()
                .zip(flags)
                .filter(|(_, seen)| !seen)
                .map(|(url, _)| url)
                .collect();
            if !to_add.is_empty() {
                self.frontier.push_many(&to_add, None).await?;
            }
        }

        Ok(())
    }
}

fn now_unix() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}
