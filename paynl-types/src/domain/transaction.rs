//! Transaction shapes exchanged with the payment provider.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider-assigned transaction identifier (e.g. `1234567890Xabc12`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "1234567890Xabc12")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Everything the provider needs to start a transaction.
///
/// Built fresh for every call and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Amount in major units (10.00 = ten euros)
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub return_url: String,
    pub exchange_url: String,
    pub expire_date: DateTime<Utc>,
    #[serde(rename = "ipaddress")]
    pub ip_address: IpAddr,
    #[serde(rename = "testmode")]
    pub test_mode: bool,
    /// End-user language
    pub language: String,
}

impl TransactionRequest {
    /// Amount in minor units, as the provider expects it.
    pub fn amount_in_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}

/// Outcome of a successfully started transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransactionResult {
    #[serde(rename = "transactionId")]
    pub transaction_id: TransactionId,
    /// Where to send the customer to complete the payment
    #[serde(rename = "redirectUrl")]
    #[schema(example = "https://api.pay.nl/controllers/payments/issuer.php?orderId=...")]
    pub redirect_url: String,
    #[serde(rename = "paymentreference")]
    #[schema(example = "0000 0001 2345 6789")]
    pub payment_reference: String,
}

/// Transaction document as returned by the provider, passed through untouched.
pub type TransactionData = serde_json::Value;

/// Parameters of an inbound exchange (status change) call from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeCallback {
    /// Event name, e.g. `new_ppt` or `pending`
    #[serde(default)]
    #[schema(example = "new_ppt")]
    pub action: String,
    /// Transaction the event refers to
    #[schema(example = "1234567890Xabc12")]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra3: Option<String>,
}

impl ExchangeCallback {
    pub fn transaction_id(&self) -> TransactionId {
        TransactionId::new(self.order_id.clone())
    }
}
