//! Retry policies for device HTTP requests.

use std::time::Duration;

use crate::domain::maintenance::Action;

/// Retry policy for a request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. Used for requests with side effects on the device.
    #[default]
    None,
    /// Retry on transport failures and busy responses.
    Idempotent,
    /// Caller-provided retry behavior.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The policy a maintenance action runs under.
    pub fn for_action(action: Action) -> Self {
        if action.is_destructive() {
            RetryPolicy::None
        } else {
            RetryPolicy::Idempotent
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Spread delays by ±25%.
    pub jitter: bool,
    /// Status codes worth another attempt.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// Reads against a device on the local network: a couple of quick retries,
    /// since the board's web server drops requests while it is writing to the SD card.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 500, 502, 503, 504],
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self.backoff_factor.powi(attempt as i32);
        let capped = (self.initial_delay.as_millis() as f64 * exp)
            .min(self.max_delay.as_millis() as f64);

        let ms = if self.jitter {
            let spread = capped * 0.25;
            (capped + (rand::random::<f64>() * 2.0 - 1.0) * spread).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(ms as u64)
    }
}
