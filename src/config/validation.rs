use crate::config::types::{
    Config, ExtractorConfig, ScannerConfig, ServerConfig, MAX_CONCURRENCY_LIMIT,
};
use crate::ConfigError;

/// Upper bound for the redirect limit
const MAX_REDIRECT_LIMIT: usize = 20;

/// Allowed range for the phone digit bounds
const PHONE_DIGIT_RANGE: std::ops::RangeInclusive<usize> = 4..=20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_scanner_config(&config.scanner)?;
    validate_extractor_config(&config.extractor)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }
    Ok(())
}

/// Validates scanner configuration
fn validate_scanner_config(config: &ScannerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    if let Some(default) = config.default_concurrency {
        if default < 1 || default > config.max_concurrency {
            return Err(ConfigError::Validation(format!(
                "default_concurrency must be between 1 and max_concurrency ({}), got {}",
                config.max_concurrency, default
            )));
        }
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be positive".to_string(),
        ));
    }

    if config.batch_timeout_ms == Some(0) {
        return Err(ConfigError::Validation(
            "batch_timeout_ms must be positive when set".to_string(),
        ));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    if config.max_urls < 1 {
        return Err(ConfigError::Validation(format!(
            "max_urls must be >= 1, got {}",
            config.max_urls
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the phone digit bounds
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("min_phone_digits", config.min_phone_digits),
        ("max_phone_digits", config.max_phone_digits),
    ] {
        if !PHONE_DIGIT_RANGE.contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between {} and {}, got {}",
                name,
                PHONE_DIGIT_RANGE.start(),
                PHONE_DIGIT_RANGE.end(),
                value
            )));
        }
    }

    if config.min_phone_digits > config.max_phone_digits {
        return Err(ConfigError::Validation(format!(
            "min_phone_digits ({}) cannot exceed max_phone_digits ({})",
            config.min_phone_digits, config.max_phone_digits
        )));
    }

    Ok(())
}
