//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server exposing the facade, including the exchange
//! endpoint the provider calls on status changes.

mod client_ip;
mod handlers;
mod server;

pub use client_ip::ClientIp;
pub use server::{HttpServer, RESERVED_PATHS};
