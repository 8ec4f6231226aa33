//! Port traits (interfaces for adapters).
//!
//! The facade depends on these traits, not on the concrete HTTP client or
//! cache backend.

mod cache;
mod gateway;

pub use cache::{CacheStore, remember};
pub use gateway::PaymentGateway;
