//! The feed listener.
//!
//! One task owns one WebSocket connection at a time. It decodes each inbound
//! frame and emits [`FeedEvent`]s over a bounded channel, in arrival order.
//! When the connection closes, or cannot be opened, it waits a fixed delay
//! and connects again, forever, until [`ListenerHandle::shutdown`] is called.
//!
//! ## Architecture
//!
//! - Exactly one connection attempt is in flight at any time. The reconnect
//!   wait runs inside the same task, so a late timer can never open a second
//!   connection.
//! - Shutdown is a `watch` signal raced against the connect, the frame read,
//!   and the reconnect wait. It cancels whichever is pending.
//! - Dropping the [`ListenerHandle`] or the event receiver stops the task.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use feedchart_feed::{FeedEvent, FeedListener, ListenerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = ListenerConfig::new("ws://127.0.0.1:8080", Duration::from_secs(2));
//!     let (listener, mut events) = FeedListener::new(config);
//!     let handle = listener.spawn();
//!
//!     while let Some(event) = events.recv().await {
//!         if let FeedEvent::Record(record) = event {
//!             println!("{} = {}", record.category, record.quantity);
//!         }
//!     }
//!     handle.stop().await;
//! }
//! ```

use std::fmt;
use std::time::Duration;

use feedchart_core::{FeedChartError, Record};
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::decode::{decode_binary_frame, decode_frame};

/// Default channel buffer size for events.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Upper bound on a single connection attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state of the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connected => f.write_str("connected"),
        }
    }
}

/// Events emitted by the feed listener.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A connection was opened.
    Connected {
        endpoint: String,
        /// 1 for the first attempt, incremented per attempt
        attempt: u64,
    },

    /// A frame decoded into a record.
    Record(Record),

    /// A frame could not be decoded. The connection stays open.
    DecodeFailed { frame: String, error: String },

    /// An open connection was closed.
    Disconnected { reason: String },

    /// A connection attempt failed before the connection opened.
    ConnectFailed { error: String },

    /// The next attempt will start after `delay`.
    ReconnectScheduled { delay: Duration, attempt: u64 },

    /// The listener stopped after a shutdown request.
    Stopped,
}

impl FeedEvent {
    /// The connection state this event leaves the listener in, if it changes it.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        match self {
            Self::Connected { .. } => Some(ConnectionState::Connected),
            Self::Disconnected { .. } | Self::ConnectFailed { .. } | Self::Stopped => {
                Some(ConnectionState::Disconnected)
            }
            _ => None,
        }
    }
}

/// Configuration for the feed listener.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// WebSocket URL of the data source
    pub endpoint: String,

    /// Fixed wait between a disconnect and the next attempt
    pub reconnect_delay: Duration,

    /// Channel buffer size for events
    pub channel_buffer: usize,

    /// Upper bound on a single connection attempt
    pub connect_timeout: Duration,
}

impl ListenerConfig {
    pub fn new(endpoint: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            reconnect_delay,
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    /// Set the channel buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer = size.max(1);
        self
    }

    /// Set the connection attempt timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// How a connected session ended.
enum SessionEnd {
    Shutdown,
    Lost(String),
}

/// WebSocket feed listener. Create with [`FeedListener::new`], start with
/// [`FeedListener::spawn`].
pub struct FeedListener {
    config: ListenerConfig,
    state: ConnectionState,
    events: mpsc::Sender<FeedEvent>,
}

/// Handle to a running listener task.
pub struct ListenerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Ask the listener to stop. Cancels a pending connect or reconnect wait.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop the listener and wait for its task to finish.
    pub async fn stop(self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            warn!(error = %e, "feed listener task ended abnormally");
        }
    }

    /// Returns true once the listener task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl FeedListener {
    /// Create a listener and the receiver for its events.
    pub fn new(config: ListenerConfig) -> (Self, mpsc::Receiver<FeedEvent>) {
        let (events, events_rx) = mpsc::channel(config.channel_buffer.max(1));
        (
            Self {
                config,
                state: ConnectionState::Disconnected,
                events,
            },
            events_rx,
        )
    }

    /// Start the listener on the current runtime.
    pub fn spawn(self) -> ListenerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        ListenerHandle { shutdown_tx, task }
    }

    /// Run the connect/read/reconnect loop until `shutdown` flips to true or
    /// its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let endpoint = self.config.endpoint.clone();
        let mut attempt: u64 = 0;

        loop {
            if self.events.is_closed() {
                debug!("event receiver dropped, stopping listener");
                break;
            }

            attempt += 1;
            debug!(%endpoint, attempt, "connecting to feed");

            let connect = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                result = tokio::time::timeout(self.config.connect_timeout, connect_async(endpoint.as_str())) => result,
            };

            match connect {
                Ok(Ok((stream, _response))) => {
                    self.transition(ConnectionState::Connected);
                    info!(%endpoint, attempt, "feed connected");
                    self.emit(FeedEvent::Connected {
                        endpoint: endpoint.clone(),
                        attempt,
                    })
                    .await;

                    let end = self.read_frames(stream, &mut shutdown).await;
                    self.transition(ConnectionState::Disconnected);
                    match end {
                        SessionEnd::Shutdown => break,
                        SessionEnd::Lost(reason) => {
                            let error = FeedChartError::connection_closed(&endpoint, &reason);
                            warn!(%error, "feed connection lost");
                            self.emit(FeedEvent::Disconnected { reason }).await;
                        }
                    }
                }
                Ok(Err(e)) => {
                    let message = e.to_string();
                    let error = FeedChartError::connection(&endpoint, &message);
                    warn!(attempt, %error, "feed connection failed");
                    self.emit(FeedEvent::ConnectFailed { error: message }).await;
                }
                Err(_) => {
                    let message = format!(
                        "timed out after {}ms",
                        self.config.connect_timeout.as_millis()
                    );
                    let error = FeedChartError::connection(&endpoint, &message);
                    warn!(attempt, %error, "feed connection failed");
                    self.emit(FeedEvent::ConnectFailed { error: message }).await;
                }
            }

            let delay = self.config.reconnect_delay;
            info!(delay_ms = delay.as_millis() as u64, next_attempt = attempt + 1, "reconnect scheduled");
            self.emit(FeedEvent::ReconnectScheduled {
                delay,
                attempt: attempt + 1,
            })
            .await;

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.transition(ConnectionState::Disconnected);
        info!(%endpoint, "feed listener stopped");
        self.emit(FeedEvent::Stopped).await;
    }

    /// Read frames until the connection ends or shutdown is requested.
    async fn read_frames(
        &mut self,
        mut stream: FeedStream,
        shutdown: &mut watch::Receiver<bool>,
    ) -> SessionEnd {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_requested(shutdown) => None,
                next = stream.next() => Some(next),
            };

            let Some(next) = next else {
                if let Err(e) = stream.close(None).await {
                    debug!(error = %e, "close handshake failed during shutdown");
                }
                return SessionEnd::Shutdown;
            };

            match next {
                None => return SessionEnd::Lost("stream ended".to_string()),
                Some(Err(e)) => return SessionEnd::Lost(e.to_string()),
                Some(Ok(Message::Close(frame))) => return SessionEnd::Lost(close_reason(frame)),
                Some(Ok(Message::Text(text))) => {
                    debug!(frame = %text, "frame received");
                    let decoded = decode_frame(&text);
                    self.handle_decoded(text, decoded).await;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    debug!(len = bytes.len(), "binary frame received");
                    let decoded = decode_binary_frame(&bytes);
                    self.handle_decoded(String::from_utf8_lossy(&bytes).into_owned(), decoded)
                        .await;
                }
                Some(Ok(_)) => {}
            }

            if self.events.is_closed() {
                return SessionEnd::Shutdown;
            }
        }
    }

    async fn handle_decoded(&self, frame: String, decoded: feedchart_core::Result<Record>) {
        match decoded {
            Ok(record) => {
                debug!(category = %record.category, quantity = record.quantity, "frame decoded");
                self.emit(FeedEvent::Record(record)).await;
            }
            Err(e) => {
                warn!(error = %e, %frame, "failed to process message");
                self.emit(FeedEvent::DecodeFailed {
                    frame,
                    error: e.to_string(),
                })
                .await;
            }
        }
    }

    fn transition(&mut self, to: ConnectionState) {
        if self.state != to {
            debug!(from = %self.state, %to, "connection state changed");
            self.state = to;
        }
    }

    async fn emit(&self, event: FeedEvent) {
        if self.events.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }
}

/// Resolves once shutdown is requested or every handle is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

fn close_reason(frame: Option<CloseFrame<'_>>) -> String {
    match frame {
        Some(frame) if frame.reason.is_empty() => {
            format!("closed by peer (code {})", u16::from(frame.code))
        }
        Some(frame) => format!(
            "closed by peer (code {}): {}",
            u16::from(frame.code),
            frame.reason
        ),
        None => "closed by peer".to_string(),
    }
}
