//! Live feed layer — events, configuration, connection state.
//!
//! The actual WS transport is compile-time dispatched:
//! - `ws-native` feature → `tokio-tungstenite` (native.rs)
//! - `ws-wasm` feature → `web-sys::WebSocket` (wasm.rs)
//!
//! Both export a `FeedClient` holding at most one connection, which is
//! re-opened a fixed delay after every close.

#[cfg(feature = "ws-native")]
pub mod native;

#[cfg(feature = "ws-wasm")]
pub mod wasm;

use crate::network::{Endpoints, DEFAULT_RECONNECT_DELAY};

// ─── FeedEvent ───────────────────────────────────────────────────────────────

/// Events emitted by the feed client to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Connection established. Emitted once per successful open.
    Connected,
    /// One text frame: a single `label,value` CSV row, not yet parsed.
    Row(String),
    /// Connection lost or attempt failed; a reconnect follows if enabled.
    Disconnected { code: Option<u16>, reason: String },
    /// A transport error that did not (yet) close the connection.
    Error(String),
}

// ─── ReadyState ──────────────────────────────────────────────────────────────

/// Connection state, numbered like the browser's `WebSocket.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closed = 3,
}

impl From<u16> for ReadyState {
    fn from(value: u16) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            // CLOSING counts as closed: no more frames will be delivered.
            _ => ReadyState::Closed,
        }
    }
}

// ─── FeedConfig ──────────────────────────────────────────────────────────────

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    /// Re-open the connection after it closes.
    pub reconnect: bool,
    /// Fixed wait between a close and the next attempt. No backoff, no cap.
    pub reconnect_delay_ms: u64,
    /// Native only; the browser applies its own handshake timeout.
    pub connect_timeout_ms: u64,
}

impl FeedConfig {
    pub fn for_endpoints(endpoints: &Endpoints) -> Self {
        Self {
            url: endpoints.feed_url().to_string(),
            ..Self::default()
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: Endpoints::default().feed_url().to_string(),
            reconnect: true,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY.as_millis() as u64,
            connect_timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_from_browser_values() {
        assert_eq!(ReadyState::from(0), ReadyState::Connecting);
        assert_eq!(ReadyState::from(1), ReadyState::Open);
        assert_eq!(ReadyState::from(2), ReadyState::Closed);
        assert_eq!(ReadyState::from(3), ReadyState::Closed);
        assert_eq!(ReadyState::from(ReadyState::Open as u16), ReadyState::Open);
    }

    #[test]
    fn test_default_config_uses_fixed_two_second_delay() {
        let config = FeedConfig::default();
        assert!(config.reconnect);
        assert_eq!(config.reconnect_delay_ms, 2000);
    }

    #[test]
    fn test_config_for_endpoints() {
        let config = FeedConfig::for_endpoints(&Endpoints::from_host("10.0.0.9"));
        assert_eq!(config.url, "ws://10.0.0.9/ws");
    }
}
