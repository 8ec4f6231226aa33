//! Configuration loading from environment.

use std::env;

use paynl_types::{FacadeOptions, GatewayConfig};

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub gateway: GatewayConfig,
    pub facade: FacadeOptions,
    /// Export spans over OTLP when set
    pub otlp_enabled: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let gateway = GatewayConfig::from_env()?;

        let callback_path =
            env::var("PAY_CALLBACK_PATH").unwrap_or_else(|_| "/payments/exchange".to_string());
        let expiry_seconds = env::var("PAY_EXPIRY_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?;

        let otlp_enabled = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok();

        Ok(Self {
            port,
            gateway,
            facade: FacadeOptions::new(callback_path, expiry_seconds),
            otlp_enabled,
        })
    }
}
