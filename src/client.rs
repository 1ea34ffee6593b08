//! High-level client — `ThermologClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the derived endpoints and the accessors.

use crate::dashboard::Dashboard;
use crate::domain::maintenance::client::Maintenance;
use crate::domain::series::client::SeriesClient;
use crate::domain::series::ChartRenderer;
use crate::error::SdkError;
use crate::http::client::DEFAULT_TIMEOUT;
use crate::http::DeviceHttp;
use crate::network::{Endpoints, DEFAULT_HOST, DEFAULT_RECONNECT_DELAY, HOST_ENV_VAR};
use crate::ws::FeedConfig;

use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::maintenance::client::Maintenance as MaintenanceClient;

/// The primary entry point for talking to one device.
#[derive(Debug, Clone)]
pub struct ThermologClient {
    pub(crate) http: DeviceHttp,
    pub(crate) endpoints: Endpoints,
    pub(crate) feed_config: FeedConfig,
}

impl ThermologClient {
    pub fn builder() -> ThermologClientBuilder {
        ThermologClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn series(&self) -> SeriesClient<'_> {
        SeriesClient { client: self }
    }

    pub fn maintenance(&self) -> Maintenance<'_> {
        Maintenance { client: self }
    }

    pub fn http(&self) -> &DeviceHttp {
        &self.http
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Feed configuration for this device.
    ///
    /// The feed client is not embedded here because its lifetime belongs to
    /// the application (a page, a terminal session).
    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed_config
    }

    /// Create a new native feed client from the current config.
    #[cfg(feature = "ws-native")]
    pub fn feed_native(&self) -> crate::ws::native::FeedClient {
        crate::ws::native::FeedClient::new(self.feed_config.clone())
    }

    /// Create a new browser feed client from the current config.
    #[cfg(feature = "ws-wasm")]
    pub fn feed_wasm(
        &self,
        on_event: impl Fn(crate::ws::FeedEvent) + 'static,
    ) -> crate::ws::wasm::FeedClient {
        crate::ws::wasm::FeedClient::new(self.feed_config.clone(), on_event)
    }

    /// A dashboard wired to this device's HTTP endpoints.
    pub fn dashboard<R: ChartRenderer>(&self, renderer: R) -> Dashboard<DeviceHttp, R> {
        Dashboard::new(self.http.clone(), renderer)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ThermologClientBuilder {
    host: String,
    reconnect: bool,
    reconnect_delay: Duration,
    request_timeout: Duration,
}

impl Default for ThermologClientBuilder {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            reconnect: true,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ThermologClientBuilder {
    /// Builder whose host comes from `THERMOLOG_HOST`, falling back to the
    /// access-point address.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(host) = std::env::var(HOST_ENV_VAR) {
            if !host.trim().is_empty() {
                builder.host = host;
            }
        }
        builder
    }

    /// Device host, optionally with port or `http(s)://` scheme.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn reconnect(mut self, enabled: bool) -> Self {
        self.reconnect = enabled;
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Per-request timeout for HTTP calls (native only).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ThermologClient, SdkError> {
        if self.host.trim().is_empty() {
            return Err(SdkError::Config("device host is empty".into()));
        }

        let endpoints = Endpoints::from_host(&self.host);
        let http = DeviceHttp::with_timeout(endpoints.http_base(), self.request_timeout)?;
        let feed_config = FeedConfig {
            reconnect: self.reconnect,
            reconnect_delay_ms: self.reconnect_delay.as_millis() as u64,
            ..FeedConfig::for_endpoints(&endpoints)
        };

        Ok(ThermologClient {
            http,
            endpoints,
            feed_config,
        })
    }
}
