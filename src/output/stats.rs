//! The `stats` subcommand: a one-line snapshot of frontier size, visited
//! count, and stored page count.

use crate::kv::{Frontier, Visited};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct Stats {
    pub frontier: u64,
    pub visited: u64,
    pub pages: u64,
}

pub async fn load_stats(frontier: &Frontier, visited: &Visited, storage: &dyn Storage) -> crate::Result<Stats> {
    Ok(Stats {
        frontier: frontier.size().await?,
        visited: visited.count().await?,
        pages: storage.count_pages().await?,
    })
}

pub fn print_stats(stats: &Stats) {
    println!(
        "Frontier: {}, Visited: {}, Pages: {}",
        stats.frontier, stats.visited, stats.pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_stats_does_not_panic() {
        print_stats(&Stats {
            frontier: 10,
            visited: 5,
            pages: 3,
        });
    }
}
