//! Gateway configuration and facade options.

use crate::error::ConfigError;

/// Production REST endpoint of the provider.
pub const DEFAULT_API_BASE_URL: &str = "https://rest-api.pay.nl";

/// Base URL used for return links when nothing else is configured.
pub const DEFAULT_URL_PREFIX: &str = "http://localhost";

/// Credentials and URL settings for talking to the provider.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_token: String,
    pub service_id: String,
    pub test_mode: bool,
    /// Application base URL, prefixed to return paths
    pub url_prefix: String,
    /// Base URL for the exchange endpoint when it differs from `url_prefix`
    pub exchange_url_prefix: Option<String>,
    pub api_base_url: String,
}

impl GatewayConfig {
    pub fn new(api_token: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            service_id: service_id.into(),
            test_mode: false,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            exchange_url_prefix: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_exchange_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exchange_url_prefix = Some(prefix.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Reads `PAY_TOKEN`, `PAY_SERVICE_ID`, `PAY_TESTMODE`, `PAY_URL_PREFIX`
    /// (falling back to `APP_URL`), `PAY_EXCHANGE_URL_PREFIX` and `PAY_API_URL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = non_empty("PAY_TOKEN").ok_or(ConfigError::MissingApiToken)?;
        let service_id = non_empty("PAY_SERVICE_ID").ok_or(ConfigError::MissingServiceId)?;
        let test_mode = match non_empty("PAY_TESTMODE") {
            Some(raw) => parse_flag(&raw)?,
            None => false,
        };
        let url_prefix = non_empty("PAY_URL_PREFIX")
            .or_else(|| non_empty("APP_URL"))
            .unwrap_or_else(|| DEFAULT_URL_PREFIX.to_string());

        Ok(Self {
            api_token,
            service_id,
            test_mode,
            url_prefix,
            exchange_url_prefix: non_empty("PAY_EXCHANGE_URL_PREFIX"),
            api_base_url: non_empty("PAY_API_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        })
    }

    /// Checks that the credentials required by the provider are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingApiToken);
        }
        if self.service_id.trim().is_empty() {
            return Err(ConfigError::MissingServiceId);
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "PAY_TESTMODE must be a boolean, got '{}'",
            other
        ))),
    }
}

/// Per-facade settings: where the provider calls back and how long a
/// transaction stays payable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeOptions {
    /// Path of the exchange endpoint, appended to the callback prefix
    pub callback_path: String,
    pub expiry_seconds: u64,
    pub return_url_prefix: Option<String>,
    pub callback_url_prefix: Option<String>,
}

impl FacadeOptions {
    pub fn new(callback_path: impl Into<String>, expiry_seconds: u64) -> Self {
        Self {
            callback_path: callback_path.into(),
            expiry_seconds,
            return_url_prefix: None,
            callback_url_prefix: None,
        }
    }

    pub fn with_return_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.return_url_prefix = Some(prefix.into());
        self
    }

    pub fn with_callback_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.callback_url_prefix = Some(prefix.into());
        self
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
    fn test_missing_token() {
        let result = GatewayConfig::from_lookup(lookup(&[("PAY_SERVICE_ID", "SL-1234-5678")]));
        assert_eq!(result, Err(ConfigError::MissingApiToken));
    }

    #[test]
    fn test_blank_service_id() {
        let result = GatewayConfig::from_lookup(lookup(&[
            ("PAY_TOKEN", "abc"),
            ("PAY_SERVICE_ID", "  "),
        ]));
        assert_eq!(result, Err(ConfigError::MissingServiceId));
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("PAY_TOKEN", "abc"),
            ("PAY_SERVICE_ID", "SL-1234-5678"),
        ]))
        .unwrap();
        assert!(!config.test_mode);
        assert_eq!(config.url_prefix, DEFAULT_URL_PREFIX);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.exchange_url_prefix.is_none());
    }

    #[test]
    fn test_url_prefix_falls_back_to_app_url() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("PAY_TOKEN", "abc"),
            ("PAY_SERVICE_ID", "SL-1234-5678"),
            ("APP_URL", "https://shop.test"),
            ("PAY_TESTMODE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.url_prefix, "https://shop.test");
        assert!(config.test_mode);
    }

    #[test]
    fn test_invalid_testmode() {
        let result = GatewayConfig::from_lookup(lookup(&[
            ("PAY_TOKEN", "abc"),
            ("PAY_SERVICE_ID", "SL-1234-5678"),
            ("PAY_TESTMODE", "maybe"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate() {
        assert!(GatewayConfig::new("abc", "SL-1").validate().is_ok());
        assert_eq!(
            GatewayConfig::new("", "SL-1").validate(),
            Err(ConfigError::MissingApiToken)
        );
        assert_eq!(
            GatewayConfig::new("abc", "").validate(),
            Err(ConfigError::MissingServiceId)
        );
    }
}
