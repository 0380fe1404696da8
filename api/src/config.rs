//! Client configuration
//!
//! Loaded from the environment:
//!
//! | Variable                  | Required | Default |
//! |---------------------------|----------|---------|
//! | `STOREFRONT_API_URL`      | yes      |         |
//! | `STOREFRONT_CDN_URL`      | yes      |         |
//! | `STOREFRONT_TIMEOUT_SECS` | no       | 30      |
//!
//! # Example
//!
//! ```
//! use storefront_api::ApiConfig;
//!
//! let config = ApiConfig::from_lookup(|key| match key {
//!     "STOREFRONT_API_URL" => Some("https://larek-api.nomoreparties.co/api/weblarek/".into()),
//!     "STOREFRONT_CDN_URL" => Some("https://larek-api.nomoreparties.co/content/weblarek".into()),
//!     _ => None,
//! })?;
//!
//! assert_eq!(config.api_url, "https://larek-api.nomoreparties.co/api/weblarek");
//! # Ok::<(), storefront_api::ConfigError>(())
//! ```

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

/// Backend base URL
pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
/// Image base URL
pub const CDN_URL_VAR: &str = "STOREFRONT_CDN_URL";
/// Request timeout, in seconds
pub const TIMEOUT_VAR: &str = "STOREFRONT_TIMEOUT_SECS";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend base URL, without trailing slash
    pub api_url: String,
    /// Base URL prepended to product image paths, without trailing slash
    pub cdn_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a config with the default timeout
    ///
    /// # Errors
    ///
    /// Returns error if either URL is not an http(s) URL
    pub fn new(api_url: &str, cdn_url: &str) -> Result<Self, ConfigError> {
        let config = Self {
            api_url: normalize(api_url),
            cdn_url: normalize(cdn_url),
            timeout: DEFAULT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns error if a required key is missing or a value is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR).ok_or(ConfigError::MissingVar(API_URL_VAR))?;
        let cdn_url = lookup(CDN_URL_VAR).ok_or(ConfigError::MissingVar(CDN_URL_VAR))?;

        let timeout = match lookup(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    return Err(ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: raw,
                    });
                }
            },
        };

        let config = Self {
            api_url: normalize(&api_url),
            cdn_url: normalize(&cdn_url),
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_api_url()?;
        self.parsed_cdn_url()?;
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                var: TIMEOUT_VAR,
                value: self.timeout.as_secs().to_string(),
            });
        }
        Ok(())
    }

    /// The backend base URL, parsed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if it is not an absolute http(s) URL
    pub fn parsed_api_url(&self) -> Result<Url, ConfigError> {
        parse_url(API_URL_VAR, &self.api_url)
    }

    /// The image base URL, parsed
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if it is not an absolute http(s) URL
    pub fn parsed_cdn_url(&self) -> Result<Url, ConfigError> {
        parse_url(CDN_URL_VAR, &self.cdn_url)
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_vars() {
        let result = ApiConfig::from_lookup(lookup(&[(CDN_URL_VAR, "http://cdn")]));
        assert_eq!(result, Err(ConfigError::MissingVar(API_URL_VAR)));

        let result = ApiConfig::from_lookup(lookup(&[(API_URL_VAR, "http://api")]));
        assert_eq!(result, Err(ConfigError::MissingVar(CDN_URL_VAR)));
    }

    #[test]
    fn test_defaults_and_trimming() {
        let config = ApiConfig::from_lookup(lookup(&[
            (API_URL_VAR, "http://localhost:3000/api/"),
            (CDN_URL_VAR, " http://localhost:3000/content// "),
        ]));
        assert_eq!(
            config,
            Ok(ApiConfig {
                api_url: "http://localhost:3000/api".to_string(),
                cdn_url: "http://localhost:3000/content".to_string(),
                timeout: DEFAULT_TIMEOUT,
            })
        );
    }

    #[test]
    fn test_timeout_parsing() {
        let config = ApiConfig::from_lookup(lookup(&[
            (API_URL_VAR, "http://api"),
            (CDN_URL_VAR, "http://cdn"),
            (TIMEOUT_VAR, "5"),
        ]));
        assert_eq!(config.map(|c| c.timeout), Ok(Duration::from_secs(5)));

        for bad in ["0", "-1", "soon"] {
            let result = ApiConfig::from_lookup(lookup(&[
                (API_URL_VAR, "http://api"),
                (CDN_URL_VAR, "http://cdn"),
                (TIMEOUT_VAR, bad),
            ]));
            assert!(
                matches!(result, Err(ConfigError::InvalidTimeout { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_url_validation() {
        assert!(matches!(
            ApiConfig::new("ftp://api", "http://cdn"),
            Err(ConfigError::InvalidUrl { var: API_URL_VAR, .. })
        ));
        assert!(matches!(
            ApiConfig::new("http://api", "https://"),
            Err(ConfigError::InvalidUrl { var: CDN_URL_VAR, .. })
        ));
        assert!(ApiConfig::new("https://api.example.com", "https://cdn.example.com").is_ok());
    }

    #[test]
    fn test_malformed_hosts_rejected() {
        assert!(matches!(
            ApiConfig::new("http://bad host/api", "http://cdn"),
            Err(ConfigError::InvalidUrl { var: API_URL_VAR, .. })
        ));
        assert!(matches!(
            ApiConfig::new("http://api", "https://[::"),
            Err(ConfigError::InvalidUrl { var: CDN_URL_VAR, .. })
        ));
        assert!(matches!(
            ApiConfig::new("not a url", "http://cdn"),
            Err(ConfigError::InvalidUrl { var: API_URL_VAR, .. })
        ));
    }

    #[test]
    fn test_parsed_urls() {
        let config = ApiConfig::new("http://localhost:3000/api/weblarek/", "http://localhost:3000/content").unwrap();
        let api = config.parsed_api_url().unwrap();
        assert_eq!(api.host_str(), Some("localhost"));
        assert_eq!(api.port(), Some(3000));
        assert_eq!(api.path(), "/api/weblarek");
    }
}
