use crate::config::types::{Config, IdentityConfig, OutputConfig, ScraperConfig};
use crate::model::Source;
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashSet;
use url::Url;

/// Upper bound for `max-concurrency`
const MAX_CONCURRENCY: u32 = 64;

/// Upper bound for `max-retries`
const MAX_RETRIES: u32 = 10;

/// Upper bound for delays and the timeout, in seconds (one day)
const MAX_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
///
/// Runs before any request is issued; a configuration that fails here never
/// reaches the fetcher.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_identity_config(&config.identity)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates scraper timing and concurrency settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_delay_range(config.min_delay, config.max_delay)?;

    if !config.timeout.is_finite() || config.timeout <= 0.0 || config.timeout > MAX_SECONDS {
        return Err(ConfigError::Validation(format!(
            "timeout must be in (0, {}] seconds, got {}",
            MAX_SECONDS, config.timeout
        )));
    }
    config.timeout()?;

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES, config.max_retries
        )));
    }

    Ok(())
}

/// Validates a `[min, max]` delay interval given in seconds
pub(crate) fn validate_delay_range(min: f64, max: f64) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::Validation(format!(
            "delays must be finite, got min={} max={}",
            min, max
        )));
    }

    if min < 0.0 || max < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delays must be >= 0, got min={} max={}",
            min, max
        )));
    }

    if max > MAX_SECONDS {
        return Err(ConfigError::Validation(format!(
            "delays must be <= {} seconds, got max={}",
            MAX_SECONDS, max
        )));
    }

    if min > max {
        return Err(ConfigError::Validation(format!(
            "min_delay ({}) must not exceed max_delay ({})",
            min, max
        )));
    }

    Ok(())
}

/// Validates the shared HTTP identity
fn validate_identity_config(config: &IdentityConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    HeaderValue::from_str(&config.user_agent).map_err(|_| {
        ConfigError::Validation(format!(
            "user_agent is not a valid header value: '{}'",
            config.user_agent
        ))
    })?;

    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!("Invalid header name: '{}'", name))
        })?;
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!("Invalid value for header '{}': '{}'", name, value))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates source entries: unique non-empty ids, HTTP(S) URLs
fn validate_sources(sources: &[Source]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for source in sources {
        if source.id().trim().is_empty() {
            return Err(ConfigError::Validation(
                "Source id cannot be empty".to_string(),
            ));
        }

        if !seen.insert(source.id()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source id '{}'",
                source.id()
            )));
        }

        validate_source_url(source.url())?;
    }

    Ok(())
}

/// Validates that a URL parses and uses the HTTP or HTTPS scheme
pub(crate) fn validate_source_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source URL '{}': {}", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Source URL '{}' must use HTTP or HTTPS",
            url
        )));
    }

    Ok(())
}
