use crate::config::types::{ApiConfig, Config, PacingConfig, QueryConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_api_config(&config.api)?;
    validate_pacing_config(&config.pacing)?;
    validate_query_config(&config.queries)?;
    Ok(())
}

/// Validates search engine configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if config.results_per_page < 1 || config.results_per_page > 100 {
        return Err(ConfigError::Validation(format!(
            "results-per-page must be between 1 and 100, got {}",
            config.results_per_page
        )));
    }

    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "search request-timeout-ms must be > 0".to_string(),
        ));
    }

    validate_domain_string(&config.search_site)?;

    Ok(())
}

/// Validates structured API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    validate_http_url("api endpoint", &config.endpoint)?;

    if config.results_per_call < 1 {
        return Err(ConfigError::Validation(format!(
            "results-per-call must be >= 1, got {}",
            config.results_per_call
        )));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "api request-timeout-ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates pacing configuration
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.jitter_min_ms > config.jitter_max_ms {
        return Err(ConfigError::Validation(format!(
            "jitter-min-ms ({}) must not exceed jitter-max-ms ({})",
            config.jitter_min_ms, config.jitter_max_ms
        )));
    }

    if config.checkpoint_every < 1 {
        return Err(ConfigError::Validation(
            "checkpoint-every must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates query generation inputs
fn validate_query_config(config: &QueryConfig) -> Result<(), ConfigError> {
    for phrase in config.base_phrases.iter().chain(&config.combined_phrases) {
        if phrase.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query phrases cannot be empty".to_string(),
            ));
        }
    }

    for site in &config.article_sites {
        validate_domain_string(site)?;
    }

    Ok(())
}

/// Validates that a value parses as an http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Validates a bare domain such as `medium.com`
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must contain at least one dot (e.g., 'medium.com')",
            domain
        )));
    }

    Ok(())
}
