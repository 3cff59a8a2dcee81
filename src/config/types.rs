use std::collections::HashSet;

/// Frozen configuration for one crawler process, loaded once at startup from
/// the environment (see [`crate::config::load_config`]).
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the atomic KV store backing the frontier/visited/rate/robots state.
    pub redis_url: String,

    /// Address of the document store backing the page store.
    pub mongo_url: String,

    /// Database name within the document store.
    pub mongo_db: String,

    /// Worker task count and HTTP connection-pool upper bound.
    pub concurrency: usize,

    /// Minimum interval, in seconds, between successive fetches to one host.
    pub domain_cooldown_seconds: f64,

    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_seconds: u64,

    /// Byte cap for an HTML body; larger bodies are stored with empty html.
    pub max_content_size_bytes: usize,

    /// HTTP User-Agent header and robots.txt matching agent.
    pub user_agent: String,

    /// Seed URLs pushed into the frontier when `run` starts.
    pub seed_urls: Vec<String>,

    /// Hosts (lowercase, `www.`-stripped) restricting extracted links, if set.
    pub allowed_domains: Option<HashSet<String>>,

    /// Stop a `run` once visited cardinality grows by this many since start.
    pub max_pages: Option<u64>,
}
