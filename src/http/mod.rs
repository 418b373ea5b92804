//! Shared HTTP plumbing: configuration, the transport used by every feature
//! client, and the error taxonomy surfaced to callers.
//!
//! Centralizing these helpers keeps timeouts, default headers, and error
//! mapping identical across auth and user calls. Nothing here stores secrets;
//! the only credential the transport holds is the session cookie in its jar.

pub mod client;
pub mod config;
pub mod errors;

pub use client::{ApiResponse, HttpClient};
pub use config::AppConfig;
pub use errors::{ApiError, ErrorDetail, ErrorModel};
