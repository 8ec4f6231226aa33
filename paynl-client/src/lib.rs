//! # Pay.nl Client
//!
//! A typed Rust client for the Pay.nl REST API, implementing the
//! [`PaymentGateway`] port.

mod wire;

use paynl_types::{
    Bank, ConfigError, ExchangeCallback, GatewayConfig, GatewayError, PaymentGateway,
    PaymentMethod, TransactionData, TransactionId, TransactionRequest, TransactionResult,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use wire::{BanksResponse, ServiceResponse, StartResponse};

const API_VERSION: &str = "v13";

/// Format the provider expects for `transaction[expireDate]`.
pub const EXPIRE_DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Pay.nl API client.
pub struct PaynlClient {
    base_url: String,
    api_token: String,
    service_id: String,
    http: Client,
}

impl PaynlClient {
    /// Creates a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            service_id: service_id.into(),
            http: Client::new(),
        }
    }

    /// Creates a client from gateway configuration, rejecting missing credentials.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            &config.api_base_url,
            &config.api_token,
            &config.service_id,
        ))
    }

    /// Replaces the underlying HTTP client (timeouts, proxies, ...).
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/Transaction/{}/json",
            self.base_url, API_VERSION, endpoint
        )
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, GatewayError> {
        let resp = self
            .http
            .get(self.url(endpoint))
            .basic_auth("token", Some(&self.api_token))
            .query(&[("serviceId", self.service_id.as_str())])
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let resp = self
            .http
            .post(self.url(endpoint))
            .basic_auth("token", Some(&self.api_token))
            .form(form)
            .send()
            .await
            .map_err(transport)?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Unauthorized(error_message(&body)));
        }
        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        wire::check_request_status(&value)?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn start_form(&self, req: &TransactionRequest) -> Vec<(&'static str, String)> {
        vec![
            ("serviceId", self.service_id.clone()),
            ("amount", req.amount_in_cents().to_string()),
            ("finishUrl", req.return_url.clone()),
            ("ipAddress", req.ip_address.to_string()),
            ("testMode", if req.test_mode { "1" } else { "0" }.to_string()),
            ("transaction[currency]", req.currency.clone()),
            ("transaction[description]", req.description.clone()),
            ("transaction[orderExchangeUrl]", req.exchange_url.clone()),
            (
                "transaction[expireDate]",
                req.expire_date.format(EXPIRE_DATE_FORMAT).to_string(),
            ),
            ("enduser[language]", req.language.clone()),
        ]
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PaynlClient {
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, GatewayError> {
        let resp: ServiceResponse = self.get("getService").await?;
        Ok(resp.into_methods())
    }

    async fn list_banks(&self, page_size: usize) -> Result<Vec<Bank>, GatewayError> {
        let resp: BanksResponse = self.get("getBanks").await?;
        Ok(resp.into_banks().into_iter().take(page_size).collect())
    }

    async fn start_transaction(
        &self,
        req: TransactionRequest,
    ) -> Result<TransactionResult, GatewayError> {
        let form = self.start_form(&req);
        let resp: StartResponse = self.post("start", &form).await?;
        tracing::debug!(transaction_id = %resp.transaction.transaction_id, "Transaction started");
        Ok(resp.into_result())
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<TransactionData, GatewayError> {
        self.post("info", &[("transactionId", id.to_string())])
            .await
    }

    async fn get_for_exchange(
        &self,
        callback: &ExchangeCallback,
    ) -> Result<TransactionData, GatewayError> {
        tracing::debug!(action = %callback.action, order_id = %callback.order_id, "Resolving exchange call");
        self.get_transaction(&callback.transaction_id()).await
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

/// Pulls a readable message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/request/errorMessage")
                .or_else(|| v.get("message"))
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
