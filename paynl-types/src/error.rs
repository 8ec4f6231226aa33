//! Error types for the payment facade.

/// Missing or malformed configuration, raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API token is not configured (PAY_TOKEN)")]
    MissingApiToken,

    #[error("Service ID is not configured (PAY_SERVICE_ID)")]
    MissingServiceId,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures reported by the payment gateway.
///
/// The facade hands these back to its callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rejected by provider ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Cache backend failures. Never surfaced by the facade, only logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
