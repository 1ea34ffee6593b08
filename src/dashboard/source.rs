//! Device source port — what the dashboard needs from the device's HTTP side.

use std::future::Future;

use crate::error::HttpError;

/// The device's plain-text HTTP endpoints.
///
/// Implemented by [`DeviceHttp`](crate::http::DeviceHttp); tests substitute
/// their own.
pub trait DeviceSource {
    /// Full CSV dump (`/getdata`).
    fn fetch_data(&self) -> impl Future<Output = Result<String, HttpError>>;

    /// Full CSV dump, for saving (`/download`).
    fn download(&self) -> impl Future<Output = Result<String, HttpError>>;

    /// Erase the stored samples (`/delete`).
    fn delete_data(&self) -> impl Future<Output = Result<String, HttpError>>;

    /// Erase the network configuration (`/clearconfig`).
    fn clear_config(&self) -> impl Future<Output = Result<String, HttpError>>;
}

#[cfg(feature = "http")]
impl DeviceSource for crate::http::DeviceHttp {
    async fn fetch_data(&self) -> Result<String, HttpError> {
        self.get_data().await
    }

    async fn download(&self) -> Result<String, HttpError> {
        crate::http::DeviceHttp::download(self).await
    }

    async fn delete_data(&self) -> Result<String, HttpError> {
        crate::http::DeviceHttp::delete_data(self).await
    }

    async fn clear_config(&self) -> Result<String, HttpError> {
        crate::http::DeviceHttp::clear_config(self).await
    }
}
