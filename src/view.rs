//! A mounted chat view: one conversation store bound to one channel.
//!
//! The view is the scope that owns the connection. `mount` opens it,
//! `unmount` closes it, and the store only ever talks to the socket through
//! the view. Dropping a view without unmounting still releases the socket.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use tracing::info;

use crate::config::ClientConfig;
use crate::net::{ChannelState, TransportChannel, TransportError};
use crate::state::chat::ConversationStore;

/// Outcome of one inbound channel event, after it has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// An answer was appended to the conversation.
    Answer(String),
    /// The channel is closed; no further events will arrive.
    Closed,
}

#[derive(Debug)]
pub struct ChatView {
    store: ConversationStore,
    channel: TransportChannel,
}

impl ChatView {
    /// Open the ask channel and start a fresh conversation.
    pub async fn mount(config: &ClientConfig) -> Self {
        let channel = TransportChannel::connect(config.ask_url()).await;
        info!(url = %channel.url(), state = ?channel.state(), "view: mounted");
        Self { store: ConversationStore::new(), channel }
    }

    /// Read-only access for presentation code.
    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    #[must_use]
    pub fn channel_state(&self) -> ChannelState {
        self.channel.state()
    }

    pub fn send_message(&mut self, text: &str) -> bool {
        self.store.send_message(text, &mut self.channel)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.store.set_draft(text);
    }

    pub fn submit_draft(&mut self) -> bool {
        self.store.submit_draft(&mut self.channel)
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn toggle_sidebar(&mut self) {
        self.store.toggle_sidebar();
    }

    /// Wait for the next channel event and apply it to the store.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Protocol`] when the backend sends a frame
    /// that does not decode. The store is left untouched in that case.
    pub async fn next_event(&mut self) -> Result<ViewEvent, TransportError> {
        match self.channel.next_answer().await {
            Some(Ok(answer)) => {
                self.store.receive_answer(&answer.answer);
                Ok(ViewEvent::Answer(answer.answer))
            }
            Some(Err(e)) => Err(e),
            None => Ok(ViewEvent::Closed),
        }
    }

    /// Release the connection. Consumes the view.
    pub async fn unmount(self) {
        info!(url = %self.channel.url(), "view: unmounting");
        self.channel.close().await;
    }
}
