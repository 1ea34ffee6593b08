//! Native live feed client — `tokio-tungstenite`.
//!
//! - Background tokio task owns the single connection
//! - Fixed-delay reconnection after every close, cancellable via `disconnect()`
//! - Protocol-level ping answered with pong
//! - Stream-based event delivery to consumer

use std::pin::Pin;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::FeedError;
use crate::ws::{FeedConfig, FeedEvent, ReadyState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Disconnect,
}

enum DisconnectReason {
    UserRequested,
    Lost,
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    config: FeedConfig,
    event_tx: mpsc::Sender<FeedEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    ready_state: Arc<AtomicU16>,
    attempts: u64,
}

impl TaskState {
    /// Queue an event for the consumer. Waits while the channel is full so
    /// no row or connection event is lost.
    async fn emit(&self, event: FeedEvent) {
        if self.event_tx.send(event).await.is_err() {
            tracing::debug!("Feed event receiver gone");
        }
    }

    fn set_state(&self, state: ReadyState) {
        self.ready_state.store(state as u16, Ordering::SeqCst);
    }
}

// ─── Public FeedClient ───────────────────────────────────────────────────────

/// Native live feed client using `tokio-tungstenite`.
///
/// The public handle talks to one background task through mpsc channels.
pub struct FeedClient {
    config: FeedConfig,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<FeedEvent>>,
    event_tx: mpsc::Sender<FeedEvent>,
    task_handle: Option<JoinHandle<()>>,
    ready_state: Arc<AtomicU16>,
}

impl FeedClient {
    /// Create a new feed client. Does not connect yet.
    pub fn new(config: FeedConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            config,
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            task_handle: None,
            ready_state: Arc::new(AtomicU16::new(ReadyState::Closed as u16)),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Start the background connection task.
    ///
    /// A no-op while a task is already running, so there is never more than
    /// one connection or pending reconnect.
    pub async fn connect(&mut self) -> Result<(), FeedError> {
        if self
            .task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
        {
            tracing::debug!("Feed already running, skipping connect");
            return Ok(());
        }

        // events left over from the previous session
        let stale = drain(self.event_rx.get_mut());
        if stale > 0 {
            tracing::debug!(stale, "Discarded events from previous session");
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);
        self.ready_state
            .store(ReadyState::Connecting as u16, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            ready_state: Arc::clone(&self.ready_state),
            attempts: 0,
        };

        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Close the connection and cancel any pending reconnect.
    pub async fn disconnect(&mut self) -> Result<(), FeedError> {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Disconnect).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let abort = handle.abort_handle();
            if tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .is_err()
            {
                tracing::warn!("Feed task did not stop in time, aborting");
                abort.abort();
            }
        }

        self.ready_state
            .store(ReadyState::Closed as u16, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.ready_state.load(Ordering::SeqCst))
    }

    /// Stream of feed events.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `disconnect()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = FeedEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for FeedClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        state.set_state(ReadyState::Connecting);
        state.attempts += 1;

        match attempt_connect(&state.config).await {
            Ok((sink, stream)) => {
                state.set_state(ReadyState::Open);
                tracing::info!(url = %state.config.url, "Live feed connected");
                state.emit(FeedEvent::Connected).await;

                let reason = run_connected(&mut state, sink, stream).await;
                state.set_state(ReadyState::Closed);

                if matches!(reason, DisconnectReason::UserRequested) {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(attempt = state.attempts, "Live feed connection failed: {}", e);
                state.set_state(ReadyState::Closed);
                state.emit(FeedEvent::Disconnected {
                    code: None,
                    reason: e.to_string(),
                }).await;
            }
        }

        if !state.config.reconnect || !wait_before_reconnect(&mut state).await {
            return;
        }
    }
}

/// Sleep the fixed reconnect delay. Returns `false` if the client asked to stop.
async fn wait_before_reconnect(state: &mut TaskState) -> bool {
    let delay = Duration::from_millis(state.config.reconnect_delay_ms);
    tracing::info!("Reconnecting in {}ms", state.config.reconnect_delay_ms);

    tokio::select! {
        () = tokio::time::sleep(delay) => true,
        cmd = state.cmd_rx.recv() => match cmd {
            Some(Command::Disconnect) | None => {
                tracing::info!("Reconnect cancelled");
                false
            }
        },
    }
}

/// The connected loop. Runs until the connection breaks or the client stops it.
async fn run_connected(
    state: &mut TaskState,
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        state.emit(FeedEvent::Row(text.as_str().to_owned())).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        tracing::info!(code, reason = %reason, "Live feed closed by server");
                        state.emit(FeedEvent::Disconnected {
                            code: Some(code),
                            reason,
                        }).await;
                        return DisconnectReason::Lost;
                    }
                    Some(Ok(Message::Binary(data))) => {
                        tracing::debug!("Ignoring {} byte binary frame", data.len());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let error = FeedError::Protocol(e.to_string());
                        tracing::error!("Live feed error: {}", error);
                        state.emit(FeedEvent::Disconnected {
                            code: None,
                            reason: error.to_string(),
                        }).await;
                        return DisconnectReason::Lost;
                    }
                    None => {
                        tracing::info!("Live feed stream ended");
                        state.emit(FeedEvent::Disconnected {
                            code: None,
                            reason: "Stream ended".into(),
                        }).await;
                        return DisconnectReason::Lost;
                    }
                }
            }

            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Disconnect) => {
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        // the caller is waiting on disconnect(), do not block on a full channel
                        let _ = state.event_tx.try_send(FeedEvent::Disconnected {
                            code: Some(1000),
                            reason: "Client disconnect".into(),
                        });
                        return DisconnectReason::UserRequested;
                    }
                    // FeedClient dropped
                    None => return DisconnectReason::UserRequested,
                }
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn attempt_connect(
    config: &FeedConfig,
) -> Result<(SplitSink<WsStream, Message>, SplitStream<WsStream>), FeedError> {
    let (ws_stream, _) = tokio::time::timeout(
        Duration::from_millis(config.connect_timeout_ms),
        connect_async(config.url.as_str()),
    )
    .await
    .map_err(|_| FeedError::Timeout(config.connect_timeout_ms))?
    .map_err(|e| FeedError::ConnectionFailed(e.to_string()))?;

    Ok(ws_stream.split())
}

fn drain(rx: &mut mpsc::Receiver<FeedEvent>) -> usize {
    let mut count = 0;
    while rx.try_recv().is_ok() {
        count += 1;
    }
    count
}

/// Close code and reason from an optional close frame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1005, "No close frame".into()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config(reconnect: bool) -> FeedConfig {
        FeedConfig {
            // port 1 is never listening on the test host
            url: "ws://127.0.0.1:1/ws".into(),
            reconnect,
            reconnect_delay_ms: 10_000,
            connect_timeout_ms: 2_000,
        }
    }

    #[test]
    fn test_feed_client_new_is_closed() {
        let client = FeedClient::new(FeedConfig::default());
        assert!(client.cmd_tx.is_none());
        assert_eq!(client.ready_state(), ReadyState::Closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn test_extract_close_with_frame() {
        let frame = CloseFrame {
            code: CloseCode::Away,
            reason: "rebooting".into(),
        };
        let (code, reason) = extract_close(Some(&frame));
        assert_eq!(code, 1001);
        assert_eq!(reason, "rebooting");
    }

    #[test]
    fn test_extract_close_no_frame() {
        let (code, reason) = extract_close(None);
        assert_eq!(code, 1005);
        assert_eq!(reason, "No close frame");
    }

    #[tokio::test]
    async fn test_disconnect_when_not_connected() {
        let mut client = FeedClient::new(FeedConfig::default());
        assert!(client.disconnect().await.is_ok());
        assert_eq!(client.ready_state(), ReadyState::Closed);
    }

    #[tokio::test]
    async fn test_failed_attempt_reports_disconnect() {
        let mut client = FeedClient::new(unreachable_config(false));
        client.connect().await.unwrap();

        let event = {
            let mut events = client.events();
            tokio::time::timeout(Duration::from_secs(5), events.next())
                .await
                .expect("timed out")
                .expect("stream ended")
        };

        assert!(matches!(event, FeedEvent::Disconnected { code: None, .. }));
        client.disconnect().await.unwrap();
        assert_eq!(client.ready_state(), ReadyState::Closed);
    }

    #[tokio::test]
    async fn test_second_connect_is_noop() {
        let mut client = FeedClient::new(unreachable_config(true));
        client.connect().await.unwrap();
        client.connect().await.unwrap();

        let mut disconnects = 0;
        {
            let mut events = client.events();
            while let Ok(Some(event)) =
                tokio::time::timeout(Duration::from_millis(500), events.next()).await
            {
                if matches!(event, FeedEvent::Disconnected { .. }) {
                    disconnects += 1;
                }
            }
        }

        // one task, one failed attempt, then a 10s wait
        assert_eq!(disconnects, 1);
        client.disconnect().await.unwrap();
    }
}
