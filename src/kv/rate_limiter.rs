//! Per-domain politeness cooldowns, enforced with a single atomic
//! check-and-reserve script so two workers racing to fetch the same domain
//! never both win.

use redis::aio::ConnectionManager;
use redis::Script;

const RL_HASH: &str = "rate:domains";

const CHECK_AND_RESERVE_LUA: &str = r#"
local key = KEYS[1]
local domain = ARGV[1]
local now = tonumber(ARGV[2])
local cooldown = tonumber(ARGV[3])
local next_ts = redis.call('HGET', key, domain)
if not next_ts then
  redis.call('HSET', key, domain, now + cooldown)
  return {tostring(now), 1}
end
next_ts = tonumber(next_ts)
if next_ts <= now then
  redis.call('HSET', key, domain, now + cooldown)
  return {tostring(now), 1}
else
  return {tostring(next_ts), 0}
end
"#;

/// Handle onto the shared per-domain rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    conn: ConnectionManager,
    script: Script,
}

impl RateLimiter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            script: Script::new(CHECK_AND_RESERVE_LUA),
        }
    }

    /// Attempts to claim `domain` for a fetch right now. Returns
    /// `(allowed_at, reserved)`: when `reserved` is true the caller may fetch
    /// immediately and has pushed the domain's next eligible time forward by
    /// `cooldown_seconds`; when false, `allowed_at` is the unix timestamp at
    /// which the domain next becomes eligible and the caller must wait or
    /// reschedule.
    pub async fn check_and_reserve(&self, domain: &str, cooldown_seconds: f64) -> redis::RedisResult<(f64, bool)> {
        let now = now_unix();
        let mut conn = self.conn.clone();
        let (allowed_at, reserved): (String, i64) = self
            .script
            .key(RL_HASH)
            .arg(domain)
            .arg(now)
            .arg(cooldown_seconds)
            .invoke_async(&mut conn)
            .await?;
        let allowed_at: f64 = allowed_at.parse().unwrap_or(now);
        Ok((allowed_at, reserved == 1))
    }
}

fn now_unix() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{AsyncCommands, Client};

    async fn test_limiter() -> Option<RateLimiter> {
        let url = std::env::var("DRIFTLINE_TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let client = Client::open(url).ok()?;
        let mut conn = ConnectionManager::new(client).await.ok()?;
        let _: () = conn.del(RL_HASH).await.ok()?;
        Some(RateLimiter::new(conn))
    }

    #[tokio::test]
    async fn test_first_request_reserved_immediately() {
        let Some(limiter) = test_limiter().await else { return };
        let (_, reserved) = limiter.check_and_reserve("example.com", 30.0).await.unwrap();
        assert!(reserved);
    }

    #[tokio::test]
    async fn test_second_request_blocked_within_cooldown() {
        let Some(limiter) = test_limiter().await else { return };
        let (_, first) = limiter.check_and_reserve("example.com", 30.0).await.unwrap();
        assert!(first);
        let (allowed_at, second) = limiter.check_and_reserve("example.com", 30.0).await.unwrap();
        assert!(!second);
        assert!(allowed_at > now_unix());
    }

    #[tokio::test]
    async fn test_independent_domains_dont_interfere() {
        let Some(limiter) = test_limiter().await else { return };
        let (_, a) = limiter.check_and_reserve("a.example.com", 30.0).await.unwrap();
        let (_, b) = limiter.check_and_reserve("b.example.com", 30.0).await.unwrap();
        assert!(a);
        assert!(b);
    }
}
