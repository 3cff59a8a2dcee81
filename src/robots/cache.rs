//! Redis-backed cache for fetched robots.txt bodies, shared across workers
//! so only one of them pays the fetch cost per domain per TTL window.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::{SystemTime, UNIX_EPOCH};

const ROBOTS_CACHE_KEY: &str = "robots:cache";
const ROBOTS_TS_KEY: &str = "robots:ts";
const DEFAULT_TTL_SECONDS: f64 = 24.0 * 3600.0;

/// Handle onto the shared robots.txt cache.
#[derive(Clone)]
pub struct RobotsCache {
    conn: ConnectionManager,
    ttl_seconds: f64,
}

impl RobotsCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn with_ttl_seconds(conn: ConnectionManager, ttl_seconds: f64) -> Self {
        Self { conn, ttl_seconds }
    }

    /// Returns the cached body for `domain` if it was fetched within the
    /// TTL window, `None` if absent or stale.
    pub async fn get(&self, domain: &str) -> redis::RedisResult<Option<String>> {
        let mut conn = self.conn.clone();
        let ts: Option<String> = conn.hget(ROBOTS_TS_KEY, domain).await?;
        let Some(ts) = ts else { return Ok(None) };
        let fetched_at: f64 = ts.parse().unwrap_or(0.0);
        if now_unix() - fetched_at >= self.ttl_seconds {
            return Ok(None);
        }
        conn.hget(ROBOTS_CACHE_KEY, domain).await
    }

    /// Stores `body` for `domain`, stamped with the current time. Both
    /// writes happen in one pipeline so a reader never sees a body without
    /// its timestamp or vice versa.
    pub async fn put(&self, domain: &str, body: &str) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .hset(ROBOTS_CACHE_KEY, domain, body)
            .hset(ROBOTS_TS_KEY, domain, now_unix().to_string())
            .query_async(&mut conn)
            .await
    }
}

fn now_unix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}
