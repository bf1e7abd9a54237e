use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    validate_domain_string(&config.domain)?;
    validate_seeds(&config.seeds, &config.domain)?;

    if Duration::try_from_secs_f64(config.politeness_delay).is_err() {
        return Err(ConfigError::Validation(format!(
            "politeness_delay must be a non-negative number of seconds, got {}",
            config.politeness_delay
        )));
    }

    if config.workers < 1 || config.workers > 32 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 32, got {}",
            config.workers
        )));
    }

    if config.page_timeout < 1 || config.document_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got page={}s document={}s",
            config.page_timeout, config.document_timeout
        )));
    }

    if config.max_document_bytes < 1 {
        return Err(ConfigError::Validation(
            "max_document_bytes must be >= 1".to_string(),
        ));
    }

    for selector in &config.main_content_selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "main_content_selectors entry '{}' is not a valid CSS selector",
                selector
            )));
        }
    }

    Ok(())
}

/// Validates that every seed is an http(s) URL on the crawl domain
fn validate_seeds(seeds: &[String], domain: &str) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use an HTTP(S) scheme",
                seed
            )));
        }

        let host = url.host_str().unwrap_or_default();
        if !host.eq_ignore_ascii_case(domain) {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' is outside the crawl domain '{}'",
                seed, domain
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output root cannot be empty".to_string(),
        ));
    }

    if let Some(summary) = &config.summary_file {
        if summary.is_empty() || summary.contains("..") {
            return Err(ConfigError::Validation(format!(
                "summary_file must be a plain file name under the output root, got '{}'",
                summary
            )));
        }
    }

    Ok(())
}

/// Validates a host name used as the crawl domain
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    // Check for invalid characters
    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    // Must contain at least one dot (e.g., mosdac.gov.in, not just "mosdac")
    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler_config() -> CrawlerConfig {
        CrawlerConfig {
            seeds: vec!["https://www.mosdac.gov.in/".to_string()],
            domain: "www.mosdac.gov.in".to_string(),
            max_depth: 2,
            politeness_delay: 0.5,
            workers: 1,
            page_timeout: 15,
            document_timeout: 30,
            max_document_bytes: 1024,
            respect_robots_txt: true,
            main_content_selectors: vec!["div.main-content".to_string()],
        }
    }

    #[test]
    fn test_valid_crawler_config() {
        assert!(validate_crawler_config(&crawler_config()).is_ok());
    }

    #[test]
    fn test_seed_outside_domain_rejected() {
        let mut config = crawler_config();
        config.seeds.push("https://vedas.sac.gov.in/".to_string());
        assert!(matches!(
            validate_crawler_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_seed_domain_is_case_insensitive() {
        let mut config = crawler_config();
        config.seeds = vec!["https://WWW.MOSDAC.GOV.IN/faq-page".to_string()];
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let mut config = crawler_config();
        config.seeds.clear();
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = crawler_config();
        config.seeds = vec!["ftp://www.mosdac.gov.in/".to_string()];
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut config = crawler_config();
        config.politeness_delay = -1.0;
        assert!(validate_crawler_config(&config).is_err());

        config.politeness_delay = f64::NAN;
        assert!(validate_crawler_config(&config).is_err());

        config.politeness_delay = 0.0;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_unrepresentable_delay_rejected() {
        let mut config = crawler_config();
        config.politeness_delay = 1e30;
        assert!(validate_crawler_config(&config).is_err());

        assert_eq!(config.politeness_delay(), Duration::ZERO);

        config.politeness_delay = f64::INFINITY;
        assert!(validate_crawler_config(&config).is_err());

        config.politeness_delay = 2.5;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = crawler_config();
        config.workers = 0;
        assert!(validate_crawler_config(&config).is_err());
        config.workers = 33;
        assert!(validate_crawler_config(&config).is_err());
        config.workers = 8;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut config = crawler_config();
        config.main_content_selectors = vec!["div[".to_string()];
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_validate_domain_string() {
        assert!(validate_domain_string("mosdac.gov.in").is_ok());
        assert!(validate_domain_string("127.0.0.1").is_ok());

        assert!(validate_domain_string("").is_err());
        assert!(validate_domain_string("*.example.com").is_err());
        assert!(validate_domain_string("example").is_err());
        assert!(validate_domain_string(".example.com").is_err());
        assert!(validate_domain_string("example.com.").is_err());
        assert!(validate_domain_string("a..b").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }

    #[test]
    fn test_summary_file_must_stay_under_root() {
        let config = OutputConfig {
            root: "out".into(),
            collision_policy: Default::default(),
            summary_file: Some("../escape.md".to_string()),
        };
        assert!(validate_output_config(&config).is_err());
    }
}
