//! The `domain-stats` subcommand: top-N hosts across frontier, visited,
//! and stored pages.

use crate::storage::Storage;
use crate::url::strip_www;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;

#[derive(Debug, Clone, serde::Serialize)]
pub struct DomainStats {
    pub frontier: Vec<(String, u64)>,
    pub visited: Vec<(String, u64)>,
    pub stored: Vec<(String, u64)>,
}

pub async fn load_domain_stats(redis: &ConnectionManager, storage: &dyn Storage, limit: usize) -> crate::Result<DomainStats> {
    let frontier = top_hosts_from_zset(redis, "frontier:zset", limit).await?;
    let visited = top_hosts_from_set(redis, "visited:set", limit).await?;
    let stored = storage
        .aggregate_by_domain(limit as i64)
        .await?
        .into_iter()
        .map(|d| (d.domain, d.count))
        .collect();

    Ok(DomainStats { frontier, visited, stored })
}

async fn top_hosts_from_zset(redis: &ConnectionManager, key: &str, limit: usize) -> crate::Result<Vec<(String, u64)>> {
    let mut conn = redis.clone();
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut iter: redis::AsyncIter<(String, f64)> = conn.zscan(key).await?;
    while let Some((member, _score)) = iter.next_item().await {
        bump_host_count(&member, &mut counts);
    }
    drop(iter);
    Ok(top_n(counts, limit))
}

async fn top_hosts_from_set(redis: &ConnectionManager, key: &str, limit: usize) -> crate::Result<Vec<(String, u64)>> {
    let mut conn = redis.clone();
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut iter: redis::AsyncIter<String> = conn.sscan(key).await?;
    while let Some(member) = iter.next_item().await {
        bump_host_count(&member, &mut counts);
    }
    drop(iter);
    Ok(top_n(counts, limit))
}

fn bump_host_count(url_str: &str, counts: &mut HashMap<String, u64>) {
    if let Ok(url) = url::Url::parse(url_str) {
        if let Some(host) = url.host_str() {
            let host = strip_www(&host.to_lowercase()).to_string();
            *counts.entry(host).or_insert(0) += 1;
        }
    }
}

fn top_n(counts: HashMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(limit);
    rows
}

pub fn print_table(title: &str, rows: &[(String, u64)]) {
    println!("\n{} (top {})", title, rows.len());
    println!("{:<40} Count", "Domain");
    for (domain, count) in rows {
        println!("{:<40} {}", domain, count);
    }
}
