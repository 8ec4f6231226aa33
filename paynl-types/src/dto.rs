//! Data Transfer Objects for callers of the facade.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to start a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartTransactionRequest {
    #[schema(example = "EUR")]
    pub currency: String,
    /// Amount in major units
    #[schema(example = 10.0)]
    pub amount: f64,
    /// Path appended to the return URL prefix
    #[schema(example = "/orders/42/return")]
    pub return_path: String,
    #[schema(example = "Order 42")]
    pub description: String,
    /// End-user language
    #[serde(default = "default_language")]
    #[schema(example = "NL")]
    pub language: String,
}

pub const DEFAULT_LANGUAGE: &str = "NL";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl StartTransactionRequest {
    pub fn new(
        currency: impl Into<String>,
        amount: f64,
        return_path: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount,
            return_path: return_path.into(),
            description: description.into(),
            language: default_language(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Response for a payment method name lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MethodNameResponse {
    #[schema(example = "10")]
    pub id: String,
    #[schema(example = "iDEAL")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_defaults_to_nl() {
        let req: StartTransactionRequest = serde_json::from_str(
            r#"{"currency":"EUR","amount":10.0,"return_path":"/r","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(req.language, "NL");
    }
}
