//! Browser driver — runs a [`Dashboard`] on the page's event loop.
//!
//! Feed events and button presses are queued on one channel and handled in
//! order by a single `spawn_local` task that owns the dashboard.

use futures_channel::mpsc::{self, UnboundedSender};
use futures_util::StreamExt;

use super::{Dashboard, DeviceSource};
use crate::domain::series::ChartRenderer;
use crate::ws::wasm::FeedClient;
use crate::ws::{FeedConfig, FeedEvent};

enum Command {
    Feed(FeedEvent),
    Reload,
    Download,
    DeleteData,
    ClearConfig,
}

/// Handle to a running browser dashboard. Dropping it closes the feed and
/// stops the event loop.
pub struct BrowserDashboard {
    feed: FeedClient,
    commands: UnboundedSender<Command>,
}

impl BrowserDashboard {
    /// Spawn the dashboard's event loop and open the feed.
    pub fn start<S, R>(mut dashboard: Dashboard<S, R>, config: FeedConfig) -> Self
    where
        S: DeviceSource + 'static,
        R: ChartRenderer + 'static,
    {
        let (commands, mut queue) = mpsc::unbounded::<Command>();

        let feed_commands = commands.clone();
        let feed = FeedClient::new(config, move |event| {
            let _ = feed_commands.unbounded_send(Command::Feed(event));
        });

        wasm_bindgen_futures::spawn_local(async move {
            while let Some(command) = queue.next().await {
                match command {
                    Command::Feed(event) => dashboard.handle_event(event).await,
                    Command::Reload => {
                        let _ = dashboard.load().await;
                    }
                    Command::Download => {
                        let _ = dashboard.download().await;
                    }
                    Command::DeleteData => {
                        let _ = dashboard.delete_data().await;
                    }
                    Command::ClearConfig => {
                        let _ = dashboard.clear_config().await;
                    }
                }
            }
            tracing::debug!("Dashboard loop stopped");
        });

        feed.connect();
        Self { feed, commands }
    }

    pub fn feed(&self) -> &FeedClient {
        &self.feed
    }

    pub fn reload(&self) {
        self.send(Command::Reload);
    }

    pub fn download(&self) {
        self.send(Command::Download);
    }

    pub fn delete_data(&self) {
        self.send(Command::DeleteData);
    }

    pub fn clear_config(&self) {
        self.send(Command::ClearConfig);
    }

    fn send(&self, command: Command) {
        if self.commands.unbounded_send(command).is_err() {
            tracing::warn!("Dashboard loop has stopped, dropping command");
        }
    }
}
