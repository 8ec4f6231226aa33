//! # Pay.nl Facade
//!
//! Application service and HTTP adapter around the Pay.nl gateway.
//!
//! ## Architecture
//!
//! - `service/` - The payment facade (shapes calls and results, caches banks)
//! - `cache/` - In-process TTL cache implementing the cache port
//! - `inbound/` - HTTP adapter (Axum server) including the exchange endpoint
//!
//! The facade is generic over `G: PaymentGateway` and `C: CacheStore`, so
//! tests and alternative backends can be injected.

pub mod cache;
pub mod inbound;
pub mod openapi;
pub mod service;


pub use cache::InMemoryCache;
pub use service::{BANK_CACHE_TTL, BANK_PAGE_SIZE, PaymentFacade};
