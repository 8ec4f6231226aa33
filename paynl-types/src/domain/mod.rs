//! Domain models mirrored from the payment provider.

pub mod method;
pub mod transaction;

pub use method::{Bank, BankList, PaymentMethod};
pub use transaction::{
    ExchangeCallback, TransactionData, TransactionId, TransactionRequest, TransactionResult,
};
