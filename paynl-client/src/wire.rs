//! Response bodies of the Pay.nl REST API.

use std::collections::BTreeMap;

use paynl_types::{Bank, GatewayError, PaymentMethod, TransactionResult};
use serde::Deserialize;
use serde_json::Value;

/// Fails with [`GatewayError::Rejected`] when the body carries a failed
/// `request.result`. Bodies without a `request` block pass.
pub(crate) fn check_request_status(body: &Value) -> Result<(), GatewayError> {
    let Some(request) = body.get("request") else {
        return Ok(());
    };
    let succeeded = match request.get("result") {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    };
    if succeeded {
        return Ok(());
    }

    Err(GatewayError::Rejected {
        code: request
            .get("errorId")
            .map(value_to_string)
            .unwrap_or_default(),
        message: request
            .get("errorMessage")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string(),
    })
}

/// Identifiers arrive as strings or numbers depending on the endpoint.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| value_to_string(&v))
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOption {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    name: String,
    #[serde(rename = "visibleName", default)]
    visible_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionList {
    List(Vec<WireOption>),
    Keyed(BTreeMap<String, WireOption>),
}

/// `Transaction/getService`
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceResponse {
    #[serde(rename = "paymentOptions")]
    payment_options: Option<OptionList>,
}

impl ServiceResponse {
    pub(crate) fn into_methods(self) -> Vec<PaymentMethod> {
        let options = match self.payment_options {
            Some(OptionList::List(list)) => list,
            Some(OptionList::Keyed(map)) => map.into_values().collect(),
            None => Vec::new(),
        };
        options
            .into_iter()
            .map(|o| PaymentMethod {
                id: o.id,
                name: o.name,
                visible_name: o.visible_name,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireBank {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    name: String,
    #[serde(default = "default_available")]
    available: bool,
}

fn default_available() -> bool {
    true
}

/// `Transaction/getBanks`, either a bare array or wrapped in `banks`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BanksResponse {
    List(Vec<WireBank>),
    Wrapped { banks: Vec<WireBank> },
}

impl BanksResponse {
    pub(crate) fn into_banks(self) -> Vec<Bank> {
        let banks = match self {
            BanksResponse::List(list) => list,
            BanksResponse::Wrapped { banks } => banks,
        };
        banks
            .into_iter()
            .filter(|b| b.available)
            .map(|b| Bank::new(b.id, b.name))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartedTransaction {
    #[serde(rename = "transactionId")]
    pub(crate) transaction_id: String,
    #[serde(rename = "paymentURL")]
    payment_url: String,
    #[serde(rename = "paymentReference", default)]
    payment_reference: String,
}

/// `Transaction/start`
#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    pub(crate) transaction: StartedTransaction,
}

impl StartResponse {
    pub(crate) fn into_result(self) -> TransactionResult {
        TransactionResult {
            transaction_id: self.transaction.transaction_id.into(),
            redirect_url: self.transaction.payment_url,
            payment_reference: self.transaction.payment_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_status_success() {
        assert!(check_request_status(&json!({"request": {"result": "1"}})).is_ok());
        assert!(check_request_status(&json!({"request": {"result": 1}})).is_ok());
        assert!(check_request_status(&json!({"transaction": {}})).is_ok());
    }

    #[test]
    fn test_request_status_failure() {
        let err = check_request_status(&json!({
            "request": {"result": "0", "errorId": 405, "errorMessage": "Amount too low"}
        }))
        .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rejected {
                code: "405".into(),
                message: "Amount too low".into()
            }
        );
    }

    #[test]
    fn test_keyed_payment_options() {
        let resp: ServiceResponse = serde_json::from_value(json!({
            "request": {"result": "1"},
            "paymentOptions": {
                "10": {"id": 10, "name": "iDEAL", "visibleName": "iDEAL"},
                "706": {"id": 706, "name": "Visa Mastercard"}
            }
        }))
        .unwrap();
        let methods = resp.into_methods();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].id, "10");
        assert_eq!(methods[0].visible_name.as_deref(), Some("iDEAL"));
        assert_eq!(methods[1].name, "Visa Mastercard");
    }

    #[test]
    fn test_unavailable_banks_are_skipped() {
        let resp: BanksResponse = serde_json::from_value(json!([
            {"id": "1", "name": "ABN Amro", "available": true},
            {"id": 2, "name": "Rabobank", "available": false},
            {"id": "4", "name": "ING"}
        ]))
        .unwrap();
        let banks = resp.into_banks();
        assert_eq!(banks, vec![Bank::new("1", "ABN Amro"), Bank::new("4", "ING")]);
    }
}
