//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use paynl_types::{CacheStore, ConfigError, PaymentGateway};

use super::handlers::{self, AppState};
use crate::PaymentFacade;
use crate::openapi::ApiDoc;

/// Paths served by the router itself. The exchange endpoint may not reuse them.
pub const RESERVED_PATHS: &[&str] = &[
    "/health",
    "/api-docs/openapi.json",
    "/api/methods",
    "/api/banks",
    "/api/transactions",
];

/// HTTP Server for the payment facade.
pub struct HttpServer<G: PaymentGateway, C: CacheStore> {
    state: Arc<AppState<G, C>>,
}

impl<G: PaymentGateway, C: CacheStore> HttpServer<G, C> {
    /// Creates a new HTTP server with the given facade.
    ///
    /// Fails when the facade's callback path would clash with a built-in
    /// route or carries route syntax.
    pub fn new(facade: PaymentFacade<G, C>) -> Result<Self, ConfigError> {
        check_callback_path(facade.callback_path())?;
        Ok(Self {
            state: Arc::new(AppState { facade }),
        })
    }

    /// Builds the Axum router with all routes.
    ///
    /// The exchange endpoint is mounted on the facade's callback path and
    /// accepts both GET (query string) and POST (form body).
    pub fn router(&self) -> Router {
        let callback_path = self.state.facade.callback_path().to_string();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(openapi_json))
            .route("/api/methods", get(handlers::list_methods::<G, C>))
            .route("/api/methods/{id}", get(handlers::method_name::<G, C>))
            .route("/api/banks", get(handlers::list_banks::<G, C>))
            .route(
                "/api/transactions",
                axum::routing::post(handlers::start_transaction::<G, C>),
            )
            .route(
                "/api/transactions/{id}",
                get(handlers::get_transaction::<G, C>),
            )
            .route(
                &callback_path,
                get(handlers::exchange_query::<G, C>).post(handlers::exchange_form::<G, C>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);
        tracing::info!(
            "Exchange endpoint mounted on {}",
            self.state.facade.callback_path()
        );

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

fn check_callback_path(path: &str) -> Result<(), ConfigError> {
    if path.contains(|c: char| matches!(c, '{' | '}' | '*')) {
        return Err(ConfigError::Invalid(format!(
            "callback path may not contain route parameters, got '{}'",
            path
        )));
    }
    let trimmed = path.trim_end_matches('/');
    if RESERVED_PATHS.contains(&trimmed) || trimmed.starts_with("/api/") {
        return Err(ConfigError::Invalid(format!(
            "callback path '{}' collides with a built-in route",
            path
        )));
    }
    Ok(())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
