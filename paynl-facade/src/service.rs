//! Payment Facade
//!
//! Turns simple calls into gateway requests and reshapes the answers.
//! Contains no transport logic; the gateway and cache are injected.

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use paynl_types::ports::remember;
use paynl_types::{
    BankList, CacheStore, ConfigError, ExchangeCallback, FacadeOptions, GatewayConfig,
    GatewayError, PaymentGateway, PaymentMethod, StartTransactionRequest, TransactionData,
    TransactionId, TransactionRequest, TransactionResult, domain::method::pluck_names,
};

/// How long the bank list is cached (2 days).
pub const BANK_CACHE_TTL: Duration = Duration::from_secs(172_800);

/// Number of banks requested from the provider.
pub const BANK_PAGE_SIZE: usize = 10;

const CACHE_NAMESPACE: &str = "paynl:v1";

/// Facade over a payment gateway.
///
/// Generic over `G: PaymentGateway` and `C: CacheStore` - both are injected
/// at construction. Configuration is fixed for the lifetime of the facade.
pub struct PaymentFacade<G: PaymentGateway, C: CacheStore> {
    gateway: G,
    cache: C,
    config: GatewayConfig,
    callback_path: String,
    expiry: chrono::Duration,
    return_url_prefix: String,
    callback_url_prefix: Option<String>,
}

impl<G: PaymentGateway, C: CacheStore> PaymentFacade<G, C> {
    /// Creates a new facade.
    ///
    /// Fails when the API token or service id is missing. Nothing is sent to
    /// the gateway here.
    pub fn new(
        config: GatewayConfig,
        options: FacadeOptions,
        gateway: G,
        cache: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if !options.callback_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "callback path must start with '/', got '{}'",
                options.callback_path
            )));
        }

        let expiry_seconds = i64::try_from(options.expiry_seconds).map_err(|_| {
            ConfigError::Invalid(format!(
                "expiry of {} seconds is out of range",
                options.expiry_seconds
            ))
        })?;
        let expiry = chrono::Duration::try_seconds(expiry_seconds).ok_or_else(|| {
            ConfigError::Invalid(format!("expiry of {} seconds is out of range", expiry_seconds))
        })?;

        let return_url_prefix = non_empty(options.return_url_prefix)
            .unwrap_or_else(|| config.url_prefix.clone());
        let callback_url_prefix = non_empty(options.callback_url_prefix)
            .or_else(|| non_empty(config.exchange_url_prefix.clone()));

        Ok(Self {
            gateway,
            cache,
            config,
            callback_path: options.callback_path,
            expiry,
            return_url_prefix,
            callback_url_prefix,
        })
    }

    /// Returns a reference to the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the path the provider calls back on.
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Methods
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all payment methods enabled for the service.
    #[tracing::instrument(skip(self))]
    pub async fn list_methods(&self) -> Result<Vec<PaymentMethod>, GatewayError> {
        self.gateway.list_payment_methods().await
    }

    /// Returns the display name of a payment method.
    ///
    /// Empty or `"0"` identifiers resolve to `None` without a gateway call.
    /// If the provider lists an id more than once, the first entry wins.
    #[tracing::instrument(skip(self))]
    pub async fn method_name(&self, id: Option<&str>) -> Result<Option<String>, GatewayError> {
        let Some(id) = id.filter(|id| !is_falsy(id)) else {
            return Ok(None);
        };

        let methods = self.list_methods().await?;
        Ok(methods.into_iter().find(|m| m.id == id).map(|m| m.name))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Banks
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns bank id to name for the first ten iDEAL banks.
    ///
    /// Served from the cache for [`BANK_CACHE_TTL`] after the first fetch.
    #[tracing::instrument(skip(self))]
    pub async fn list_banks(&self) -> Result<BankList, GatewayError> {
        let key = self.banks_cache_key();
        remember(&self.cache, &key, BANK_CACHE_TTL, || async {
            tracing::debug!("Bank list not cached, fetching from gateway");
            let banks = self.gateway.list_banks(BANK_PAGE_SIZE).await?;
            Ok::<_, GatewayError>(pluck_names(banks))
        })
        .await
    }

    /// Cache key of the bank list, scoped to this service id.
    pub fn banks_cache_key(&self) -> String {
        format!("{}:{}:banks", CACHE_NAMESPACE, self.config.service_id)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Builds the provider request for a new transaction.
    pub fn build_transaction_request(
        &self,
        req: StartTransactionRequest,
        ip_address: IpAddr,
    ) -> TransactionRequest {
        let callback_prefix = self
            .callback_url_prefix
            .as_deref()
            .unwrap_or(&self.return_url_prefix);

        TransactionRequest {
            amount: req.amount,
            currency: req.currency,
            description: req.description,
            return_url: format!("{}{}", self.return_url_prefix, req.return_path),
            exchange_url: format!("{}{}", callback_prefix, self.callback_path),
            expire_date: Utc::now()
                .checked_add_signed(self.expiry)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ip_address,
            test_mode: self.config.test_mode,
            language: req.language,
        }
    }

    /// Starts a transaction on behalf of the client at `ip_address`.
    #[tracing::instrument(skip(self, req), fields(currency = %req.currency, amount = req.amount))]
    pub async fn start_transaction(
        &self,
        req: StartTransactionRequest,
        ip_address: IpAddr,
    ) -> Result<TransactionResult, GatewayError> {
        let request = self.build_transaction_request(req, ip_address);
        let result = self.gateway.start_transaction(request).await?;
        tracing::info!(transaction_id = %result.transaction_id, "Transaction started");
        Ok(result)
    }

    /// Gets the current data of a transaction.
    #[tracing::instrument(skip(self, id), fields(transaction_id = %id))]
    pub async fn get_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<TransactionData, GatewayError> {
        self.gateway.get_transaction(id).await
    }

    /// Gets the transaction an inbound exchange call refers to.
    #[tracing::instrument(skip(self, callback), fields(action = %callback.action, order_id = %callback.order_id))]
    pub async fn get_for_exchange(
        &self,
        callback: &ExchangeCallback,
    ) -> Result<TransactionData, GatewayError> {
        self.gateway.get_for_exchange(callback).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_falsy(id: &str) -> bool {
    id.is_empty() || id == "0"
}
