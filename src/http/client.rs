//! Low-level HTTP client — `DeviceHttp`.
//!
//! One method per device endpoint. Every endpoint answers with plain text
//! (CSV or a confirmation line), so responses are returned as `String`.

use crate::domain::maintenance::Action;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::network::DATA_PATH;

use reqwest::Client;
use std::time::Duration;

/// Request timeout on native targets. The browser applies its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Low-level HTTP client for a Thermolog device.
#[derive(Debug, Clone)]
pub struct DeviceHttp {
    base_url: String,
    client: Client,
}

impl DeviceHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout).pool_max_idle_per_host(2);
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Data ─────────────────────────────────────────────────────────────

    /// Full CSV dump for the initial chart load.
    pub async fn get_data(&self) -> Result<String, HttpError> {
        let url = format!("{}{}", self.base_url, DATA_PATH);
        self.get_text(&url, RetryPolicy::Idempotent).await
    }

    // ── Maintenance ──────────────────────────────────────────────────────

    pub async fn download(&self) -> Result<String, HttpError> {
        self.action(Action::Download).await
    }

    pub async fn delete_data(&self) -> Result<String, HttpError> {
        self.action(Action::DeleteData).await
    }

    pub async fn clear_config(&self) -> Result<String, HttpError> {
        self.action(Action::ClearConfig).await
    }

    async fn action(&self, action: Action) -> Result<String, HttpError> {
        let url = format!("{}{}", self.base_url, action.path());
        self.get_text(&url, RetryPolicy::for_action(action)).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get_text(&self, url: &str, retry: RetryPolicy) -> Result<String, HttpError> {
        let config = match retry {
            RetryPolicy::None => return self.do_request(url).await,
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c,
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout() || re.is_request();
                            retryable
                        }
                        _ => false,
                    };

                    if !should_retry {
                        return Err(e);
                    }

                    if attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request(&self, url: &str) -> Result<String, HttpError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.text().await?);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            400..=499 if status_code != 429 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}
