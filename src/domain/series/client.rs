//! Series sub-client — one-shot fetch of the stored samples.

use super::wire::{self, ParseReport};
use super::Series;
use crate::client::ThermologClient;
use crate::error::SdkError;

/// Sub-client for series operations.
pub struct SeriesClient<'a> {
    pub(crate) client: &'a ThermologClient,
}

impl<'a> SeriesClient<'a> {
    /// Raw CSV text as served by `/getdata`.
    pub async fn fetch_raw(&self) -> Result<String, SdkError> {
        Ok(self.client.http.get_data().await?)
    }

    /// Fetch and parse every stored sample.
    pub async fn fetch(&self) -> Result<(Series, ParseReport), SdkError> {
        let raw = self.fetch_raw().await?;
        let (samples, report) = wire::parse_table(&raw);
        Ok((samples.into_iter().collect(), report))
    }
}
