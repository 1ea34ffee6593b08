//! HTTP client layer — `DeviceHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::DeviceHttp;
pub use retry::{RetryConfig, RetryPolicy};
