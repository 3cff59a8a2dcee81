use crate::config::types::Config;
use crate::ConfigError;

/// Validates the entire configuration, composing one check per field group.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_urls(config)?;
    validate_concurrency(config)?;
    validate_timing(config)?;
    validate_content_cap(config)?;
    validate_user_agent(config)?;
    Ok(())
}

fn validate_urls(config: &Config) -> Result<(), ConfigError> {
    if config.redis_url.is_empty() {
        return Err(ConfigError::Validation("REDIS_URL cannot be empty".to_string()));
    }
    if config.mongo_url.is_empty() {
        return Err(ConfigError::Validation("MONGO_URL cannot be empty".to_string()));
    }
    if config.mongo_db.is_empty() {
        return Err(ConfigError::Validation("MONGO_DB cannot be empty".to_string()));
    }
    for seed in &config.seed_urls {
        url::Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }
    Ok(())
}

fn validate_concurrency(config: &Config) -> Result<(), ConfigError> {
    if config.concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "CONCURRENCY must be >= 1, got {}",
            config.concurrency
        )));
    }
    Ok(())
}

fn validate_timing(config: &Config) -> Result<(), ConfigError> {
    if config.domain_cooldown_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "DOMAIN_COOLDOWN_SECONDS must be >= 0, got {}",
            config.domain_cooldown_seconds
        )));
    }
    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "REQUEST_TIMEOUT_SECONDS must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }
    Ok(())
}

fn validate_content_cap(config: &Config) -> Result<(), ConfigError> {
    if config.max_content_size_bytes == 0 {
        return Err(ConfigError::Validation(
            "MAX_CONTENT_SIZE_BYTES must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_user_agent(config: &Config) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation("USER_AGENT cannot be empty".to_string()));
    }
    Ok(())
}
