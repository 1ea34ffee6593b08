//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// The device answers 404 when its SD card holds no data file.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Live feed (WebSocket) errors.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out after {0}ms")]
    Timeout(u64),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// A CSV row that could not become a [`Sample`](crate::domain::series::Sample).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("empty row")]
    Empty,

    #[error("expected 2 columns, found {0}")]
    ColumnCount(usize),

    #[error("missing label")]
    MissingLabel,

    #[error("value {0:?} is not a number")]
    InvalidValue(String),

    #[error("value {0:?} is not finite")]
    NonFinite(String),
}
