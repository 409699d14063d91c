use crate::config::types::CrawlConfig;
use crate::ConfigError;

/// Upper bound on the worker pool size
const MAX_PARALLELISM: usize = 1024;

/// Validates a resolved crawl configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 and the delay >= 0 hold by construction

    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request timeout must be greater than 0ms".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
