//! HTTP client tests against a local axum app standing in for the device.

#![cfg(feature = "http")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use thermolog_sdk::client::ThermologClient;
use thermolog_sdk::domain::maintenance::Action;
use thermolog_sdk::domain::series::{NullRenderer, Sample};
use thermolog_sdk::error::{HttpError, SdkError};
use thermolog_sdk::http::DeviceHttp;

const STORED: &str = "Time,Temperature\r\n2024-01-01 10:00:00,21.5\r\n2024-01-01 10:05:00,21.7\r\n";

/// What the fake device does for one path.
#[derive(Clone, Copy)]
enum Reply {
    Text(u16, &'static str),
    /// Hold the request and never answer, like `/clearconfig` on the real device.
    Silent,
}

#[derive(Clone)]
struct DeviceState {
    route: fn(&str) -> Reply,
    requests: Arc<Mutex<Vec<String>>>,
}

struct Device {
    base_url: String,
    host: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Device {
    fn hits(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

async fn answer(State(state): State<DeviceState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(path.clone());

    match (state.route)(&path) {
        Reply::Text(status, body) => {
            let status = StatusCode::from_u16(status).unwrap();
            (status, body).into_response()
        }
        Reply::Silent => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn spawn_device(route: fn(&str) -> Reply) -> Device {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = DeviceState {
        route,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/getdata", get(answer))
        .route("/download", get(answer))
        .route("/delete", get(answer))
        .route("/clearconfig", get(answer))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Device {
        base_url: format!("http://{}", host),
        host,
        requests,
    }
}

fn healthy(path: &str) -> Reply {
    match path {
        "/getdata" | "/download" => Reply::Text(200, STORED),
        "/delete" => Reply::Text(200, "Data deleted\r\n"),
        "/clearconfig" => Reply::Silent,
        _ => Reply::Text(404, "Not found"),
    }
}

fn no_sd_card(path: &str) -> Reply {
    match path {
        "/getdata" => Reply::Text(404, "File not found"),
        "/delete" => Reply::Text(500, "Failed to delete file"),
        _ => Reply::Text(503, "busy"),
    }
}

fn client_for(device: &Device) -> ThermologClient {
    ThermologClient::builder()
        .host(&device.host)
        .request_timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

// ─── DeviceHttp ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_data_returns_body_verbatim() {
    let device = spawn_device(healthy).await;
    let http = DeviceHttp::new(&device.base_url).unwrap();

    let body = http.get_data().await.unwrap();

    assert_eq!(body, STORED);
    assert_eq!(device.hits("/getdata"), 1);
}

#[tokio::test]
async fn test_pooled_connection_serves_repeat_requests() {
    let device = spawn_device(healthy).await;
    let http = DeviceHttp::new(&device.base_url).unwrap();

    assert_eq!(http.get_data().await.unwrap(), STORED);
    assert_eq!(http.download().await.unwrap(), STORED);
    assert_eq!(http.get_data().await.unwrap(), STORED);

    assert_eq!(device.hits("/getdata"), 2);
    assert_eq!(device.hits("/download"), 1);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let device = spawn_device(no_sd_card).await;
    let http = DeviceHttp::new(&device.base_url).unwrap();

    let result = http.get_data().await;

    assert!(matches!(result, Err(HttpError::NotFound(body)) if body == "File not found"));
    assert_eq!(device.hits("/getdata"), 1);
}

#[tokio::test]
async fn test_failed_delete_is_not_retried() {
    let device = spawn_device(no_sd_card).await;
    let http = DeviceHttp::new(&device.base_url).unwrap();

    let result = http.delete_data().await;

    assert!(matches!(
        result,
        Err(HttpError::ServerError { status: 500, .. })
    ));
    assert_eq!(device.hits("/delete"), 1);
}

#[tokio::test]
async fn test_busy_download_is_retried() {
    let device = spawn_device(no_sd_card).await;
    let http = DeviceHttp::new(&device.base_url).unwrap();

    let result = http.download().await;

    assert!(matches!(
        result,
        Err(HttpError::MaxRetriesExceeded { attempts: 3, .. })
    ));
    assert_eq!(device.hits("/download"), 3);
}

#[tokio::test]
async fn test_silent_clear_config_times_out_once() {
    let device = spawn_device(healthy).await;
    let http = DeviceHttp::with_timeout(&device.base_url, Duration::from_millis(300)).unwrap();

    let result = http.clear_config().await;

    assert!(matches!(result, Err(HttpError::Reqwest(e)) if e.is_timeout()));
    assert_eq!(device.hits("/clearconfig"), 1);
}

// ─── ThermologClient ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_series_fetch_parses_rows() {
    let device = spawn_device(healthy).await;
    let client = client_for(&device);

    let (series, report) = client.series().fetch().await.unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 0);
    assert_eq!(series.last(), Some(&Sample::new("2024-01-01 10:05:00", 21.7)));
}

#[tokio::test]
async fn test_delete_confirmation_is_trimmed() {
    let device = spawn_device(healthy).await;
    let client = client_for(&device);

    let confirmation = client.maintenance().delete_data().await.unwrap();

    assert_eq!(confirmation.action, Action::DeleteData);
    assert_eq!(confirmation.message, "Data deleted");
}

#[cfg(feature = "native")]
#[tokio::test]
async fn test_download_to_writes_file() {
    let device = spawn_device(healthy).await;
    let client = client_for(&device);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");

    let written = client.maintenance().download_to(&path).await.unwrap();

    assert_eq!(written, STORED.len());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), STORED);
}

// ─── Dashboard over HTTP ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_load_over_http() {
    let device = spawn_device(healthy).await;
    let client = client_for(&device);
    let mut dashboard = client.dashboard(NullRenderer);

    let report = dashboard.load().await.unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(dashboard.series().len(), 2);
}

#[tokio::test]
async fn test_dashboard_without_sd_card() {
    let device = spawn_device(no_sd_card).await;
    let client = client_for(&device);
    let mut dashboard = client.dashboard(NullRenderer);

    dashboard.load().await.unwrap();
    assert!(dashboard.series().is_empty());

    let result = dashboard.delete_data().await;
    assert!(matches!(result, Err(SdkError::Http(HttpError::ServerError { status: 500, .. }))));
    assert!(dashboard.last_error().is_some());
}
