use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::collections::{HashMap, HashSet};

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";
const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";
const DEFAULT_MONGO_DB: &str = "crawler";
const DEFAULT_CONCURRENCY: &str = "200";
const DEFAULT_DOMAIN_COOLDOWN_SECONDS: &str = "1.0";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: &str = "15";
const DEFAULT_MAX_CONTENT_SIZE_BYTES: &str = "3145728";
const DEFAULT_USER_AGENT: &str = "DistributedCrawler/1.0";

/// Loads configuration from the process environment, first loading a `.env`
/// file in the working directory if one is present. Values already present
/// in the environment are never overridden by the file.
///
/// # Example
///
/// ```no_run
/// use driftline::config::load_config;
///
/// let config = load_config().unwrap();
/// println!("Concurrency: {}", config.concurrency);
/// ```
pub fn load_config() -> Result<Config, ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) | Err(dotenvy::Error::Io(_)) => {}
        Err(e) => return Err(ConfigError::Dotenv(e.to_string())),
    }

    let env: HashMap<String, String> = std::env::vars().collect();
    load_config_from_map(&env)
}

/// Builds and validates a [`Config`] from an explicit key/value map, without
/// touching the process environment. Used directly by `load_config` and
/// exercised in isolation by tests.
pub fn load_config_from_map(env: &HashMap<String, String>) -> Result<Config, ConfigError> {
    let get = |key: &str, default: &str| -> String {
        env.get(key).cloned().unwrap_or_else(|| default.to_string())
    };

    let concurrency = get("CONCURRENCY", DEFAULT_CONCURRENCY)
        .parse::<usize>()
        .map_err(|e| ConfigError::Validation(format!("CONCURRENCY: {}", e)))?;

    let domain_cooldown_seconds = get("DOMAIN_COOLDOWN_SECONDS", DEFAULT_DOMAIN_COOLDOWN_SECONDS)
        .parse::<f64>()
        .map_err(|e| ConfigError::Validation(format!("DOMAIN_COOLDOWN_SECONDS: {}", e)))?;

    let request_timeout_seconds = get("REQUEST_TIMEOUT_SECONDS", DEFAULT_REQUEST_TIMEOUT_SECONDS)
        .parse::<u64>()
        .map_err(|e| ConfigError::Validation(format!("REQUEST_TIMEOUT_SECONDS: {}", e)))?;

    let max_content_size_bytes = get("MAX_CONTENT_SIZE_BYTES", DEFAULT_MAX_CONTENT_SIZE_BYTES)
        .parse::<usize>()
        .map_err(|e| ConfigError::Validation(format!("MAX_CONTENT_SIZE_BYTES: {}", e)))?;

    let max_pages = match env.get("MAX_PAGES") {
        Some(v) if !v.trim().is_empty() => Some(
            v.parse::<u64>()
                .map_err(|e| ConfigError::Validation(format!("MAX_PAGES: {}", e)))?,
        ),
        _ => None,
    };

    let config = Config {
        redis_url: get("REDIS_URL", DEFAULT_REDIS_URL),
        mongo_url: get("MONGO_URL", DEFAULT_MONGO_URL),
        mongo_db: get("MONGO_DB", DEFAULT_MONGO_DB),
        concurrency,
        domain_cooldown_seconds,
        request_timeout_seconds,
        max_content_size_bytes,
        user_agent: get("USER_AGENT", DEFAULT_USER_AGENT),
        seed_urls: parse_csv(env.get("SEED_URLS")),
        allowed_domains: parse_domains(env.get("ALLOWED_DOMAINS")),
        max_pages,
    };

    validate(&config)?;
    Ok(config)
}

fn parse_csv(value: Option<&String>) -> Vec<String> {
    match value {
        Some(v) => v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn parse_domains(value: Option<&String>) -> Option<HashSet<String>> {
    let v = value?;
    let set: HashSet<String> = v
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}
