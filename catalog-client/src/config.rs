//! Client configuration

use std::time::Duration;
use thiserror::Error;

/// Default API root used by the admin and storefront builds
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default admin table page size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum image upload size (5MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Environment variable names read by [`ClientConfig::from_env`]
pub const ENV_BASE_URL: &str = "CATALOG_API_URL";
pub const ENV_TOKEN: &str = "CATALOG_API_TOKEN";
pub const ENV_TIMEOUT: &str = "CATALOG_API_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Client configuration for the remote catalog API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (e.g., "http://localhost:8000/api")
    pub base_url: String,

    /// Bearer token, if the API requires one
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Page size used when the caller does not pick one
    pub page_size: u32,

    /// Upload size limit, checked before sending
    pub max_image_bytes: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            page_size: DEFAULT_PAGE_SIZE,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Build from `CATALOG_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.trim().is_empty()) {
            config.token = Some(token);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout = parse_positive(ENV_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the default page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the upload size limit
    pub fn with_max_image_bytes(mut self, bytes: usize) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://shop.example/api"),
            (ENV_TOKEN, "secret"),
            (ENV_TIMEOUT, "5"),
            (ENV_PAGE_SIZE, "25"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://shop.example/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_invalid_page_size() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: ENV_PAGE_SIZE,
                value: "0".to_string()
            }
        );
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT, "soon")])).is_err());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://x")
            .with_token("t")
            .with_timeout(2)
            .with_page_size(0)
            .with_max_image_bytes(10);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.max_image_bytes, 10);
        assert_eq!(config.token.as_deref(), Some("t"));
    }
}
