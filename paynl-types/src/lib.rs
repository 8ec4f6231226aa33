//! # Pay.nl Types
//!
//! Domain types, configuration and port traits for the Pay.nl payment facade.
//! This crate performs no IO - only data structures and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Provider data shapes (payment methods, banks, transactions)
//! - `ports/` - Traits the gateway client and cache adapters implement
//! - `config` - Gateway configuration and facade options
//! - `dto` - Request/response shapes for the facade's callers
//! - `error` - Configuration, gateway and cache error types

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use config::{FacadeOptions, GatewayConfig};
pub use domain::{
    Bank, BankList, ExchangeCallback, PaymentMethod, TransactionData, TransactionId,
    TransactionRequest, TransactionResult,
};
pub use dto::*;
pub use error::{CacheError, ConfigError, GatewayError};
pub use ports::{CacheStore, PaymentGateway};
