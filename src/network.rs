//! Network defaults and endpoint derivation for a Thermolog device.

use std::time::Duration;

/// Address the device serves on when it runs as its own access point.
pub const DEFAULT_HOST: &str = "192.168.4.1";

/// Environment variable read by [`ThermologClientBuilder::from_env`](crate::client::ThermologClientBuilder::from_env).
pub const HOST_ENV_VAR: &str = "THERMOLOG_HOST";

/// Live feed path on the device.
pub const FEED_PATH: &str = "/ws";
/// Full CSV dump used for the initial chart load.
pub const DATA_PATH: &str = "/getdata";
/// Same CSV, served as a file download.
pub const DOWNLOAD_PATH: &str = "/download";
/// Clears the stored samples.
pub const DELETE_PATH: &str = "/delete";
/// Clears the stored Wi-Fi configuration.
pub const CLEAR_CONFIG_PATH: &str = "/clearconfig";

/// File name offered for the downloaded CSV.
pub const DEFAULT_DOWNLOAD_FILE: &str = "data.csv";

/// Fixed delay between a lost connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// HTTP and WebSocket URLs for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    http_base: String,
    feed_url: String,
}

impl Endpoints {
    /// Derive both URLs from a host such as `192.168.4.1`, `thermolog.local:8080`
    /// or `https://logger.example.com`.
    ///
    /// A bare host gets `http://` and `ws://`; an `https://` host switches the
    /// feed to `wss://`.
    pub fn from_host(host: &str) -> Self {
        let host = host.trim().trim_end_matches('/');
        let (secure, authority) = if let Some(rest) = host.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = host.strip_prefix("http://") {
            (false, rest)
        } else {
            (false, host)
        };
        let (http_scheme, ws_scheme) = if secure { ("https", "wss") } else { ("http", "ws") };

        Self {
            http_base: format!("{}://{}", http_scheme, authority),
            feed_url: format!("{}://{}{}", ws_scheme, authority, FEED_PATH),
        }
    }

    /// Derive the endpoints from the page the WASM module is running on.
    #[cfg(feature = "ws-wasm")]
    pub fn from_location() -> Option<Self> {
        let location = web_sys::window()?.location();
        let host = location.host().ok()?;
        let secure = location.protocol().ok().as_deref() == Some("https:");
        if secure {
            Some(Self::from_host(&format!("https://{}", host)))
        } else {
            Some(Self::from_host(&host))
        }
    }

    pub fn http_base(&self) -> &str {
        &self.http_base
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Absolute URL for an HTTP path on the device.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_base, path)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_host(DEFAULT_HOST)
    }
}
