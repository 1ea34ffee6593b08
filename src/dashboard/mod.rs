//! Dashboard — wires the live feed, the device's HTTP endpoints and the chart.
//!
//! Feed events enter through [`Dashboard::handle_event`]: `Connected` triggers
//! one full load, each `Row` is appended. The maintenance buttons map to
//! [`Dashboard::download`], [`Dashboard::delete_data`] and
//! [`Dashboard::clear_config`].
//!
//! Events are handled one at a time by whoever owns the dashboard, so rows
//! that arrive during a load are applied after it.

#[cfg(feature = "ws-wasm")]
pub mod browser;
pub mod source;

pub use source::DeviceSource;

use crate::domain::maintenance::{Action, Confirmation};
use crate::domain::series::{ChartRenderer, ChartSink, Notice, NullRenderer, ParseReport, Series};
use crate::error::{HttpError, SdkError};
use crate::network::DEFAULT_DOWNLOAD_FILE;
use crate::ws::FeedEvent;

/// One device's dashboard: a data source plus the chart it feeds.
pub struct Dashboard<S, R = NullRenderer> {
    source: S,
    chart: ChartSink<R>,
    last_error: Option<String>,
}

impl<S: DeviceSource, R: ChartRenderer> Dashboard<S, R> {
    pub fn new(source: S, renderer: R) -> Self {
        Self {
            source,
            chart: ChartSink::new(renderer),
            last_error: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn chart(&self) -> &ChartSink<R> {
        &self.chart
    }

    pub fn series(&self) -> &Series {
        self.chart.series()
    }

    /// Message of the most recent failed device action, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the full dump and bulk-replace the chart.
    ///
    /// A 404 means the device has no data file yet, which empties the chart.
    /// Any other failure leaves the current series in place.
    pub async fn load(&mut self) -> Result<ParseReport, SdkError> {
        let raw = match self.source.fetch_data().await {
            Ok(raw) => raw,
            Err(HttpError::NotFound(_)) => {
                tracing::info!("Device has no data file yet");
                String::new()
            }
            Err(e) => {
                tracing::warn!("Data load failed: {}", e);
                return Err(e.into());
            }
        };

        let report = self.chart.bulk_replace(&raw);
        tracing::info!(
            accepted = report.accepted,
            rejected = report.rejected,
            "Chart loaded"
        );
        Ok(report)
    }

    /// Apply one feed event.
    pub async fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => {
                // failure is logged by load(); the next open retries it
                let _ = self.load().await;
            }
            FeedEvent::Row(row) => {
                if let Err(e) = self.chart.append_one(&row) {
                    tracing::debug!(row = %row.trim(), error = %e, "Dropping malformed live row");
                }
            }
            FeedEvent::Disconnected { code, reason } => {
                tracing::debug!(?code, reason = %reason, "Live feed down, chart paused");
            }
            FeedEvent::Error(message) => {
                tracing::debug!("Live feed error: {}", message);
            }
        }
    }

    /// Drive the dashboard from a native feed until its event stream ends.
    #[cfg(feature = "ws-native")]
    pub async fn run(&mut self, feed: &crate::ws::native::FeedClient) {
        use futures_util::StreamExt;

        let mut events = feed.events();
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
    }

    // ── Maintenance ──────────────────────────────────────────────────────

    /// Fetch the CSV file and hand it to the renderer as `data.csv`.
    pub async fn download(&mut self) -> Result<String, SdkError> {
        match self.source.download().await {
            Ok(csv) => {
                tracing::info!(bytes = csv.len(), "Downloaded device data");
                self.last_error = None;
                self.chart
                    .renderer_mut()
                    .save_file(DEFAULT_DOWNLOAD_FILE, &csv);
                Ok(csv)
            }
            Err(e) => Err(self.fail(Action::Download, e)),
        }
    }

    /// Erase the device's samples, then reload the chart.
    pub async fn delete_data(&mut self) -> Result<Confirmation, SdkError> {
        let result = self.source.delete_data().await;
        self.confirm(Action::DeleteData, result).await
    }

    /// Erase the device's network configuration, then reload the chart.
    pub async fn clear_config(&mut self) -> Result<Confirmation, SdkError> {
        let result = self.source.clear_config().await;
        self.confirm(Action::ClearConfig, result).await
    }

    async fn confirm(
        &mut self,
        action: Action,
        result: Result<String, HttpError>,
    ) -> Result<Confirmation, SdkError> {
        let message = match result {
            Ok(message) => message.trim().to_string(),
            Err(e) => return Err(self.fail(action, e)),
        };

        tracing::info!(action = action.as_str(), message = %message, "Device action confirmed");
        self.last_error = None;
        self.chart
            .renderer_mut()
            .notice(Notice::Info(message.clone()));

        let _ = self.load().await;
        Ok(Confirmation { action, message })
    }

    fn fail(&mut self, action: Action, error: HttpError) -> SdkError {
        tracing::error!(action = action.as_str(), "Device action failed: {}", error);
        let text = format!("{} failed: {}", action.as_str(), error);
        self.chart.renderer_mut().notice(Notice::Error(text.clone()));
        self.last_error = Some(text);
        error.into()
    }
}
