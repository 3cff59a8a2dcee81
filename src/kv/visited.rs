//! The visited-URL set: a Redis set (membership) paired with a hash of
//! visit timestamps, shared across every worker process.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

const VISITED_SET: &str = "visited:set";
const VISITED_TS: &str = "visited:ts";

/// Handle onto the shared visited-URL set.
#[derive(Clone)]
pub struct Visited {
    conn: ConnectionManager,
}

impl Visited {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn is_visited(&self, url: &str) -> redis::RedisResult<bool> {
        let mut conn = self.conn.clone();
        conn.sismember(VISITED_SET, url).await
    }

    /// Marks `url` visited at `ts` (unix seconds), defaulting to now. The
    /// membership add and the timestamp write happen in one pipeline so a
    /// concurrent reader never observes one without the other.
    pub async fn mark_visited(&self, url: &str, ts: Option<f64>) -> redis::RedisResult<()> {
        let ts = ts.unwrap_or_else(now_unix);
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .sadd(VISITED_SET, url)
            .hset(VISITED_TS, url, ts.to_string())
            .query_async(&mut conn)
            .await
    }

    /// Batch membership check, preserving the order of `urls`.
    pub async fn has_many(&self, urls: &[String]) -> redis::RedisResult<Vec<bool>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        conn.smismember(VISITED_SET, urls).await
    }

    pub async fn count(&self) -> redis::RedisResult<u64> {
        let mut conn = self.conn.clone();
        conn.scard(VISITED_SET).await
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
    use redis::Client;

    async fn test_visited() -> Option<Visited> {
        let url = std::env::var("DRIFTLINE_TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let client = Client::open(url).ok()?;
        let conn = ConnectionManager::new(client).await.ok()?;
        let visited = Visited::new(conn);
        let mut raw = visited.conn.clone();
        let _: () = redis::cmd("DEL")
            .arg(VISITED_SET)
            .arg(VISITED_TS)
            .query_async(&mut raw)
            .await
            .ok()?;
        Some(visited)
    }

    #[tokio::test]
    async fn test_mark_and_check_visited() {
        let Some(visited) = test_visited().await else { return };
        assert!(!visited.is_visited("https://example.com/").await.unwrap());
        visited.mark_visited("https://example.com/", None).await.unwrap();
        assert!(visited.is_visited("https://example.com/").await.unwrap());
        assert_eq!(visited.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_has_many_preserves_order() {
        let Some(visited) = test_visited().await else { return };
        visited.mark_visited("https://example.com/a", None).await.unwrap();
        let urls = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ];
        let result = visited.has_many(&urls).await.unwrap();
        assert_eq!(result, vec![true, false]);
    }

    #[tokio::test]
    async fn test_has_many_empty_input() {
        let Some(visited) = test_visited().await else { return };
        assert_eq!(visited.has_many(&[]).await.unwrap(), Vec::<bool>::new());
    }
}
