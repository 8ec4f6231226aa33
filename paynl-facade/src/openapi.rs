//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use paynl_types::domain::{Bank, ExchangeCallback, PaymentMethod, TransactionId, TransactionResult};
use paynl_types::dto::{MethodNameResponse, StartTransactionRequest};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List payment methods enabled for the service
#[utoipa::path(
    get,
    path = "/api/methods",
    tag = "methods",
    responses(
        (status = 200, description = "Payment methods", body = Vec<PaymentMethod>),
        (status = 502, description = "Gateway unreachable or credentials rejected")
    )
)]
async fn list_methods() {}

/// Resolve a payment method's display name
#[utoipa::path(
    get,
    path = "/api/methods/{id}",
    tag = "methods",
    params(
        ("id" = String, Path, description = "Payment option ID")
    ),
    responses(
        (status = 200, description = "Method name", body = MethodNameResponse),
        (status = 404, description = "Unknown payment method")
    )
)]
async fn method_name() {}

/// List iDEAL banks (first ten, cached for two days)
#[utoipa::path(
    get,
    path = "/api/banks",
    tag = "methods",
    responses(
        (status = 200, description = "Bank ID to name", body = inline(serde_json::Value), example = json!({"1": "ABN Amro", "4": "ING"})),
        (status = 502, description = "Gateway unreachable")
    )
)]
async fn list_banks() {}

/// Start a transaction
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "transactions",
    request_body = StartTransactionRequest,
    responses(
        (status = 201, description = "Transaction started", body = TransactionResult),
        (status = 422, description = "Rejected by the provider"),
        (status = 502, description = "Gateway unreachable or credentials rejected")
    )
)]
async fn start_transaction() {}

/// Get a transaction's current data
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "transactions",
    params(
        ("id" = TransactionId, Path, description = "Provider transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction data as returned by the provider", body = inline(serde_json::Value)),
        (status = 502, description = "Gateway unreachable")
    )
)]
async fn get_transaction() {}

/// OpenAPI documentation for the payment facade.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pay.nl Payment Facade API",
        version = "1.0.0",
        description = "Lists payment methods and banks, starts transactions and reports their status.\n\nThe provider's exchange calls arrive on the configured callback path, which is not part of this document.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_methods,
        method_name,
        list_banks,
        start_transaction,
        get_transaction,
    ),
    components(
        schemas(
            PaymentMethod,
            Bank,
            MethodNameResponse,
            StartTransactionRequest,
            TransactionResult,
            TransactionId,
            ExchangeCallback,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "methods", description = "Payment methods and banks"),
        (name = "transactions", description = "Start and inspect transactions"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/transactions"));
        assert!(doc.paths.paths.contains_key("/api/banks"));
    }
}
