//! WebSocket transport channel for the ask endpoint.
//!
//! DESIGN
//! ======
//! A channel wraps exactly one socket session and walks a one-way state
//! machine: `Connecting → Open → Closed`. There is no reconnect; a closed
//! channel stays closed and a new one must be built.
//!
//! The socket is split on open. Outbound text goes through an unbounded
//! queue drained by a writer task, so `send` never awaits. Inbound frames are
//! pulled by the owner with `next_answer`, which keeps every state change on
//! the owner's task.
//!
//! LIFECYCLE
//! =========
//! 1. `connect` → open socket, spawn writer (failure → `Closed`, logged)
//! 2. `send` queues `{"question": ...}` frames while `Open`
//! 3. `next_answer` yields decoded answers until the peer closes
//! 4. `close` drains the writer and sends a close frame; drop aborts it

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

use crate::protocol::{self, Answer, ProtocolError};
use crate::state::chat::QuestionLink;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on how long `close` waits for the close frame to flush.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tungstenite::Error>),
    #[error("bad frame from backend: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Connection status of a [`TransportChannel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Connecting,
    Open,
    Closed,
}

// =============================================================================
// CHANNEL
// =============================================================================

/// One WebSocket session with the backend.
pub struct TransportChannel {
    url: String,
    state: ChannelState,
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: Option<SplitStream<WsStream>>,
    writer: Option<JoinHandle<()>>,
}

impl TransportChannel {
    /// A channel that has not attempted its connection yet.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), state: ChannelState::Connecting, outbound: None, inbound: None, writer: None }
    }

    /// Build a channel and open it. Never fails: a connection error leaves
    /// the channel `Closed` and is logged.
    pub async fn connect(url: impl Into<String>) -> Self {
        let mut channel = Self::new(url);
        if let Err(e) = channel.open().await {
            error!(url = %channel.url, error = %e, "ws: connect failed");
        }
        channel
    }

    /// Perform the connection attempt for a `Connecting` channel.
    ///
    /// Does nothing once the channel has left `Connecting`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the handshake fails; the channel
    /// is `Closed` afterwards.
    pub async fn open(&mut self) -> Result<(), TransportError> {
        if self.state != ChannelState::Connecting {
            return Ok(());
        }

        let stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                self.state = ChannelState::Closed;
                return Err(TransportError::Connect(Box::new(e)));
            }
        };

        let (sink, stream) = stream.split();
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        self.writer = Some(tokio::spawn(write_loop(sink, rx)));
        self.outbound = Some(tx);
        self.inbound = Some(stream);
        self.state = ChannelState::Open;

        info!(url = %self.url, "ws: connected");
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Queue a question frame. Silently dropped unless the channel is `Open`.
    pub fn send(&mut self, text: &str) -> bool {
        if self.state != ChannelState::Open {
            debug!(url = %self.url, state = ?self.state, "ws: send dropped, channel not open");
            return false;
        }
        let Some(tx) = &self.outbound else {
            return false;
        };
        if tx.send(protocol::encode_question(text)).is_err() {
            warn!(url = %self.url, "ws: writer gone, closing channel");
            self.mark_closed();
            return false;
        }
        true
    }

    /// Wait for the next answer frame.
    ///
    /// Returns `None` once the channel is closed, whether by the peer, by a
    /// socket error, or because it never opened. A frame that does not decode
    /// is returned as an error; the channel stays open.
    pub async fn next_answer(&mut self) -> Option<Result<Answer, TransportError>> {
        loop {
            let inbound = self.inbound.as_mut()?;
            match inbound.next().await {
                Some(Ok(Message::Text(text))) => {
                    debug!(url = %self.url, bytes = text.len(), "ws: recv frame");
                    return Some(protocol::decode_answer(text.as_str()).map_err(TransportError::from));
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!(url = %self.url, "ws: closed by peer");
                    self.mark_closed();
                    return None;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(url = %self.url, error = %e, "ws: recv error");
                    self.mark_closed();
                    return None;
                }
            }
        }
    }

    /// Tear the session down. Consumes the channel, so it runs once.
    pub async fn close(mut self) {
        let was = self.state;
        self.mark_closed();
        if let Some(writer) = self.writer.take() {
            if !join_or_abort(writer, CLOSE_TIMEOUT).await {
                warn!(url = %self.url, "ws: close timed out, writer aborted");
            }
        }
        info!(url = %self.url, from = ?was, "ws: channel closed");
    }

    fn mark_closed(&mut self) {
        self.state = ChannelState::Closed;
        // Dropping the sender ends the writer loop, which closes the sink.
        self.outbound = None;
        self.inbound = None;
    }
}

impl Drop for TransportChannel {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.abort();
        }
    }
}

impl QuestionLink for TransportChannel {
    fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    fn send_question(&mut self, text: &str) -> bool {
        self.send(text)
    }
}

impl std::fmt::Debug for TransportChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportChannel").field("url", &self.url).field("state", &self.state).finish_non_exhaustive()
    }
}

// =============================================================================
// WRITER
// =============================================================================

/// Wait up to `limit` for the writer to finish, aborting it otherwise.
/// Returns whether it finished on its own.
async fn join_or_abort(mut writer: JoinHandle<()>, limit: Duration) -> bool {
    if tokio::time::timeout(limit, &mut writer).await.is_ok() {
        return true;
    }
    writer.abort();
    false
}

async fn write_loop(mut sink: SplitSink<WsStream, Message>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = rx.recv().await {
        if let Err(e) = sink.send(Message::Text(text.into())).await {
            warn!(error = %e, "ws: send failed");
            break;
        }
    }
    let _ = sink.close().await;
}
