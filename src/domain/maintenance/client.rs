//! Maintenance sub-client.

use super::{Action, Confirmation};
use crate::client::ThermologClient;
use crate::error::SdkError;

/// Sub-client for device maintenance operations.
pub struct Maintenance<'a> {
    pub(crate) client: &'a ThermologClient,
}

impl<'a> Maintenance<'a> {
    /// The full CSV file.
    pub async fn download(&self) -> Result<String, SdkError> {
        Ok(self.client.http.download().await?)
    }

    /// Download the CSV and write it to `path`. Returns the number of bytes written.
    #[cfg(feature = "native")]
    pub async fn download_to(&self, path: impl AsRef<std::path::Path>) -> Result<usize, SdkError> {
        let csv = self.download().await?;
        tokio::fs::write(path.as_ref(), csv.as_bytes()).await?;
        tracing::info!(path = %path.as_ref().display(), bytes = csv.len(), "Saved device data");
        Ok(csv.len())
    }

    /// Erase the stored samples on the device.
    pub async fn delete_data(&self) -> Result<Confirmation, SdkError> {
        let message = self.client.http.delete_data().await?;
        Ok(Confirmation {
            action: Action::DeleteData,
            message: message.trim().to_string(),
        })
    }

    /// Erase the device's stored network configuration.
    pub async fn clear_config(&self) -> Result<Confirmation, SdkError> {
        let message = self.client.http.clear_config().await?;
        Ok(Confirmation {
            action: Action::ClearConfig,
            message: message.trim().to_string(),
        })
    }
}
