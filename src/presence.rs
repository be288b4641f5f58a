//! Realtime presence channel.
//!
//! ARCHITECTURE
//! ============
//! The store talks to the channel through two seams: [`PresenceConnector`]
//! opens a connection for a user, and the returned [`PresenceHandle`]
//! reports liveness and accepts a close signal. The websocket implementation
//! splits the stream and runs a reader task that forwards `getOnlineUsers`
//! events to the store's callback; a shutdown channel lets `close` end the
//! task and send the websocket close frame without blocking the caller.
//!
//! There is no reconnect or backoff here: a dropped channel stays dropped
//! until the store opens a new one after the next successful auth action.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::PresenceError;

/// Event name carrying the full replacement list of online user ids.
pub const ONLINE_USERS_EVENT: &str = "getOnlineUsers";

/// Callback invoked with the replacement online-user list on each event.
pub type OnlineUsersFn = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// Handle to an open presence connection.
pub trait PresenceHandle: Send + Sync {
    /// Whether the connection still reports itself live.
    fn is_connected(&self) -> bool;
    /// Signal the connection to close. Idempotent; returns immediately.
    fn close(&self);
}

/// Opens presence connections for a user. Enables mocking in tests.
#[async_trait]
pub trait PresenceConnector: Send + Sync {
    /// Open a channel for `user_id`, wiring `on_online_users` to incoming
    /// presence events.
    ///
    /// # Errors
    ///
    /// Returns a [`PresenceError`] if the URL cannot be derived or the
    /// handshake fails.
    async fn connect(
        &self,
        user_id: &str,
        on_online_users: OnlineUsersFn,
    ) -> Result<Arc<dyn PresenceHandle>, PresenceError>;
}

/// Wire shape of inbound channel events: `{"event": "...", "data": ...}`.
#[derive(Debug, Deserialize)]
struct ChannelEvent {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Extract the online-user list from a raw text frame, if it is a
/// `getOnlineUsers` event with a well-formed payload.
#[must_use]
pub(crate) fn parse_online_users(text: &str) -> Option<Vec<String>> {
    let event: ChannelEvent = serde_json::from_str(text).ok()?;
    if event.event != ONLINE_USERS_EVENT {
        return None;
    }
    serde_json::from_value(event.data).ok()
}

/// Tokio-tungstenite implementation of [`PresenceConnector`].
pub struct WsPresenceConnector {
    config: SessionConfig,
}

impl WsPresenceConnector {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

struct WsPresenceHandle {
    connected: Arc<AtomicBool>,
    shutdown: mpsc::UnboundedSender<()>,
}

impl PresenceHandle for WsPresenceHandle {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) {
        // The reader task sends the close frame; a dropped task means the
        // connection is already gone and the signal is a no-op.
        let _ = self.shutdown.send(());
    }
}

#[async_trait]
impl PresenceConnector for WsPresenceConnector {
    async fn connect(
        &self,
        user_id: &str,
        on_online_users: OnlineUsersFn,
    ) -> Result<Arc<dyn PresenceHandle>, PresenceError> {
        let url = self.config.presence_url(user_id)?;
        let (stream, _) = connect_async(url.as_str()).await.map_err(Box::new)?;
        debug!(target: "chat_session::presence", %url, "presence channel open");

        let (mut write, mut read) = stream.split();
        let connected = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel::<()>();

        let task_connected = Arc::clone(&connected);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    msg = read.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Some(ids) = parse_online_users(text.as_str()) {
                                on_online_users(ids);
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(error)) => {
                            warn!(target: "chat_session::presence", %error, "presence recv error");
                            break;
                        }
                    },
                    _ = shutdown_rx.recv() => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            task_connected.store(false, Ordering::SeqCst);
            debug!(target: "chat_session::presence", "presence channel closed");
        });

        Ok(Arc::new(WsPresenceHandle { connected, shutdown: shutdown_tx }))
    }
}
