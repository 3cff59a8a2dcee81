//! The shared URL frontier: a Redis sorted set of URLs due for crawling.
//!
//! Claiming a URL is a read-then-delete that must be atomic across however
//! many worker processes are draining the set concurrently, so the pop is a
//! server-side Lua script rather than a client-side `ZRANGEBYSCORE` + `ZREM`
//! pair (which would race: two workers could read the same member before
//! either removes it).

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

const FRONTIER_ZSET: &str = "frontier:zset";

const POP_READY_LUA: &str = r#"
local key = KEYS[1]
local max_count = tonumber(ARGV[1])
local now = tonumber(ARGV[2])
local results = {}
local popped = 0
while popped < max_count do
  local items = redis.call('ZRANGEBYSCORE', key, '-inf', now, 'LIMIT', 0, 1)
  if #items == 0 then
    break
  end
  local member = items[1]
  local removed = redis.call('ZREM', key, member)
  if removed == 1 then
    table.insert(results, member)
    popped = popped + 1
  end
end
return results
"#;

/// Handle onto the frontier sorted set.
#[derive(Clone)]
pub struct Frontier {
    conn: ConnectionManager,
    pop_ready: Script,
}

impl Frontier {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            pop_ready: Script::new(POP_READY_LUA),
        }
    }

    /// Schedules `url` for crawling at `scheduled_at` (unix seconds), or now
    /// if not given.
    pub async fn push(&self, url: &str, scheduled_at: Option<f64>) -> redis::RedisResult<()> {
        let score = scheduled_at.unwrap_or_else(now_unix);
        let mut conn = self.conn.clone();
        conn.zadd(FRONTIER_ZSET, url, score).await
    }

    /// Schedules many URLs at once, all at the same score.
    pub async fn push_many(&self, urls: &[String], scheduled_at: Option<f64>) -> redis::RedisResult<()> {
        if urls.is_empty() {
            return Ok(());
        }
        let score = scheduled_at.unwrap_or_else(now_unix);
        let items: Vec<(f64, &str)> = urls.iter().map(|u| (score, u.as_str())).collect();
        let mut conn = self.conn.clone();
        conn.zadd_multiple(FRONTIER_ZSET, &items).await
    }

    /// Atomically claims up to `max_count` URLs that are due (score <= now).
    pub async fn pop_ready(&self, max_count: usize) -> redis::RedisResult<Vec<String>> {
        let mut conn = self.conn.clone();
        self.pop_ready
            .key(FRONTIER_ZSET)
            .arg(max_count)
            .arg(now_unix())
            .invoke_async(&mut conn)
            .await
    }

    pub async fn size(&self) -> redis::RedisResult<u64> {
        let mut conn = self.conn.clone();
        conn.zcard(FRONTIER_ZSET).await
    }

    pub async fn clear(&self) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        conn.del(FRONTIER_ZSET).await
    }
}

fn now_unix() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs_f64()
}
