//! Payment gateway port.
//!
//! Implemented by the Pay.nl REST client; tests substitute their own.

use crate::domain::{
    Bank, ExchangeCallback, PaymentMethod, TransactionData, TransactionId, TransactionRequest,
    TransactionResult,
};
use crate::error::GatewayError;

/// Operations the payment provider offers.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Lists the payment methods enabled for the service.
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, GatewayError>;

    /// Lists at most `page_size` iDEAL banks.
    async fn list_banks(&self, page_size: usize) -> Result<Vec<Bank>, GatewayError>;

    /// Starts a transaction.
    async fn start_transaction(
        &self,
        req: TransactionRequest,
    ) -> Result<TransactionResult, GatewayError>;

    /// Gets the current data of a transaction.
    async fn get_transaction(&self, id: &TransactionId) -> Result<TransactionData, GatewayError>;

    /// Gets the transaction an inbound exchange call refers to.
    async fn get_for_exchange(
        &self,
        callback: &ExchangeCallback,
    ) -> Result<TransactionData, GatewayError>;
}
