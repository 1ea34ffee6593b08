//! # Thermolog SDK
//!
//! A Rust SDK for the Thermolog temperature logger's dashboard, supporting both
//! native and WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Samples, CSV row parsing, chart state (always available, WASM-safe)
//! 2. **HTTP API** — `DeviceHttp` with per-action retry policies
//! 3. **Live feed** — Compile-time dispatch: `tokio-tungstenite` (native) / `web-sys` (WASM)
//! 4. **High-Level Client** — `ThermologClient` with nested sub-clients
//! 5. **Dashboard** — feed events and maintenance actions driving one chart
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use thermolog_sdk::prelude::*;
//!
//! let client = ThermologClient::builder().host("192.168.4.1").build()?;
//!
//! let mut feed = client.feed_native();
//! let mut dashboard = client.dashboard(NullRenderer);
//! feed.connect().await?;
//! dashboard.run(&feed).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Domain modules (vertical slices): types, wire format, state, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Device addresses and endpoint paths.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: Live feed ───────────────────────────────────────────────────────

/// Live feed client: events, configuration, reconnection.
pub mod ws;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `ThermologClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Dashboard ───────────────────────────────────────────────────────

/// Dashboard controller tying the feed, the device and the chart together.
pub mod dashboard;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Domain types: series
    pub use crate::domain::series::{
        ChartRenderer, ChartSink, Notice, NullRenderer, ParseReport, Sample, Series,
    };

    // Domain types: maintenance
    pub use crate::domain::maintenance::{Action, Confirmation};

    // Errors
    pub use crate::error::{FeedError, HttpError, RowError, SdkError};

    // Network
    pub use crate::network::{Endpoints, DEFAULT_HOST, DEFAULT_RECONNECT_DELAY};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{MaintenanceClient, ThermologClient, ThermologClientBuilder};
    #[cfg(feature = "http")]
    pub use crate::http::{DeviceHttp, RetryConfig, RetryPolicy};

    // Live feed types
    pub use crate::ws::{FeedConfig, FeedEvent, ReadyState};
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::FeedClient;

    // Dashboard
    pub use crate::dashboard::{Dashboard, DeviceSource};
    #[cfg(feature = "ws-wasm")]
    pub use crate::dashboard::browser::BrowserDashboard;
}
