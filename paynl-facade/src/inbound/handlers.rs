//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use paynl_types::{
    CacheStore, ExchangeCallback, GatewayError, MethodNameResponse, PaymentGateway,
    StartTransactionRequest, TransactionData, TransactionId,
};

use super::client_ip::ClientIp;
use crate::PaymentFacade;

/// Application state shared across handlers.
pub struct AppState<G: PaymentGateway, C: CacheStore> {
    pub facade: PaymentFacade<G, C>,
}

/// Wrapper to implement IntoResponse for GatewayError (orphan rule workaround).
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GatewayError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Unauthorized(_)
            | GatewayError::Api { .. }
            | GatewayError::Transport(_)
            | GatewayError::Decode(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!(error = %self.0, "Gateway call failed");

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": message,
            "code": 404
        })),
    )
        .into_response()
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List payment methods.
#[tracing::instrument(skip(state))]
pub async fn list_methods<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
) -> Result<impl IntoResponse, ApiError> {
    let methods = state.facade.list_methods().await?;
    Ok(Json(methods))
}

/// Resolve the name of a payment method.
#[tracing::instrument(skip(state), fields(method_id = %id))]
pub async fn method_name<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.facade.method_name(Some(&id)).await? {
        Some(name) => Ok(Json(MethodNameResponse { id, name }).into_response()),
        None => Ok(not_found(format!("Payment method {}", id))),
    }
}

/// List iDEAL banks (cached).
#[tracing::instrument(skip(state))]
pub async fn list_banks<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
) -> Result<impl IntoResponse, ApiError> {
    let banks = state.facade.list_banks().await?;
    Ok(Json(banks))
}

/// Start a transaction for the calling client.
#[tracing::instrument(skip(state, req), fields(client_ip = %ip, currency = %req.currency, amount = req.amount))]
pub async fn start_transaction<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
    ClientIp(ip): ClientIp,
    Json(req): Json<StartTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.facade.start_transaction(req, ip).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Get a transaction's current data.
#[tracing::instrument(skip(state), fields(transaction_id = %id))]
pub async fn get_transaction<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .facade
        .get_transaction(&TransactionId::new(id))
        .await?;
    Ok(Json(data))
}

// ─────────────────────────────────────────────────────────────────────────────
// Exchange
// ─────────────────────────────────────────────────────────────────────────────

/// Exchange call sent as a query string.
pub async fn exchange_query<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
    Query(callback): Query<ExchangeCallback>,
) -> Response {
    exchange(&state, callback).await
}

/// Exchange call sent as a form body.
pub async fn exchange_form<G: PaymentGateway, C: CacheStore>(
    State(state): State<Arc<AppState<G, C>>>,
    Form(callback): Form<ExchangeCallback>,
) -> Response {
    exchange(&state, callback).await
}

/// Answers the provider with `TRUE|` on success and `FALSE|` otherwise, so it
/// retries failed deliveries.
#[tracing::instrument(skip(state, callback), fields(action = %callback.action, order_id = %callback.order_id))]
async fn exchange<G: PaymentGateway, C: CacheStore>(
    state: &AppState<G, C>,
    callback: ExchangeCallback,
) -> Response {
    match state.facade.get_for_exchange(&callback).await {
        Ok(data) => {
            let state_name = exchange_state(&data);
            tracing::info!(state = %state_name, "Exchange processed");
            (StatusCode::OK, format!("TRUE| {}", state_name)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Exchange failed");
            (StatusCode::OK, format!("FALSE| {}", e)).into_response()
        }
    }
}

fn exchange_state(data: &TransactionData) -> String {
    data.pointer("/paymentDetails/stateName")
        .or_else(|| data.get("state"))
        .and_then(|s| s.as_str())
        .unwrap_or("processed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exchange_state() {
        assert_eq!(
            exchange_state(&json!({"paymentDetails": {"stateName": "PAID"}})),
            "PAID"
        );
        assert_eq!(exchange_state(&json!({"state": "PENDING"})), "PENDING");
        assert_eq!(exchange_state(&json!({})), "processed");
    }

    #[test]
    fn test_rejected_maps_to_422() {
        let resp = ApiError(GatewayError::Rejected {
            code: "1".into(),
            message: "bad".into(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_transport_maps_to_502() {
        let resp = ApiError(GatewayError::Transport("down".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
