use crate::config::types::{Config, CrawlerConfig, RendererConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    Ok(())
}

/// Validates crawl coordination settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.wait_selector_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "wait-selector-timeout-ms must be >= 100ms, got {}ms",
            config.wait_selector_timeout_ms
        )));
    }

    if config.wait_poll_interval_ms == 0
        || config.wait_poll_interval_ms > config.wait_selector_timeout_ms
    {
        return Err(ConfigError::Validation(format!(
            "wait-poll-interval-ms must be between 1 and wait-selector-timeout-ms ({}), got {}",
            config.wait_selector_timeout_ms, config.wait_poll_interval_ms
        )));
    }

    if config.checkpoint_every < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint-every must be >= 1, got {}",
            config.checkpoint_every
        )));
    }

    if config.initial_total_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "initial-total-pages must be >= 1, got {}",
            config.initial_total_pages
        )));
    }

    Ok(())
}

/// Validates renderer settings
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_interval_is_allowed() {
        let mut config = Config::default();
        config.crawler.page_query_interval_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_wait_timeout_too_small() {
        let mut config = Config::default();
        config.crawler.wait_selector_timeout_ms = 50;
        config.crawler.wait_poll_interval_ms = 10;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_poll_interval_longer_than_timeout() {
        let mut config = Config::default();
        config.crawler.wait_poll_interval_ms = config.crawler.wait_selector_timeout_ms + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_poll_interval() {
        let mut config = Config::default();
        config.crawler.wait_poll_interval_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_checkpoint_cadence() {
        let mut config = Config::default();
        config.crawler.checkpoint_every = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_initial_pages() {
        let mut config = Config::default();
        config.crawler.initial_total_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = Config::default();
        config.renderer.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_request_timeout_too_small() {
        let mut config = Config::default();
        config.renderer.request_timeout_ms = 10;
        assert!(validate(&config).is_err());
    }
}
