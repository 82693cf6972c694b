#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use tokio::sync::watch;

/// Greeting shown at the top of every fresh conversation.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your Procurement Assistant. I can help you explore procurement \
data, whether you're looking for the total number of orders in a specific period, the quarter with the \
highest spending, or frequently ordered items. Just ask me a question, and I'll provide the information \
you need!";

/// A single chat message. Position in the history is its only identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub is_bot: bool,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_bot: false }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_bot: true }
    }

    #[must_use]
    pub fn welcome() -> Self {
        Self::bot(WELCOME_MESSAGE)
    }
}

/// Payload of a scroll-to-end notification.
///
/// `generation` advances on every reset, so a reader that missed the reset
/// still knows to redraw even if the history has grown back since.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Revision {
    pub generation: u64,
    pub len: usize,
}

/// Outbound half of the backend link, as seen by the store.
pub trait QuestionLink {
    /// Whether the link can currently carry a question.
    fn is_open(&self) -> bool;

    /// Forward a question. Returns `false` if it was dropped.
    fn send_question(&mut self, text: &str) -> bool;
}

/// Conversation state for one chat view.
///
/// The store is the only writer of the history and the loading flag.
/// Presentation code reads it through the accessors and listens on
/// [`ConversationStore::subscribe`] to know when to scroll to the newest message.
#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    is_loading: bool,
    show_sidebar: bool,
    draft: String,
    generation: u64,
    changed: watch::Sender<Revision>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        let messages = vec![ChatMessage::welcome()];
        let (changed, _) = watch::channel(Revision { generation: 0, len: messages.len() });
        Self { messages, is_loading: false, show_sidebar: false, draft: String::new(), generation: 0, changed }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn show_sidebar(&self) -> bool {
        self.show_sidebar
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Number of resets since the store was created.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scroll-to-end notifications carrying the reset generation and message count.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Revision> {
        self.changed.subscribe()
    }

    /// Append the user's question and forward it to the link.
    ///
    /// Ignored while a question is in flight, the link is not open, or the
    /// link drops the question. Returns whether the question was accepted.
    pub fn send_message(&mut self, text: &str, link: &mut impl QuestionLink) -> bool {
        if self.is_loading || !link.is_open() {
            tracing::debug!(is_loading = self.is_loading, "chat: send ignored");
            return false;
        }
        if !link.send_question(text) {
            tracing::debug!("chat: link dropped question");
            return false;
        }
        self.messages.push(ChatMessage::user(text));
        self.is_loading = true;
        self.notify();
        true
    }

    /// Append the backend's answer and end the in-flight state.
    pub fn receive_answer(&mut self, text: &str) {
        self.messages.push(ChatMessage::bot(text));
        self.is_loading = false;
        self.notify();
    }

    /// Start over with only the welcome message.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::welcome());
        self.is_loading = false;
        self.generation += 1;
        self.notify();
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Send the current draft as a question.
    ///
    /// The draft is cleared once it is handed to [`Self::send_message`]; while a
    /// question is in flight it is kept so the user does not lose it.
    pub fn submit_draft(&mut self, link: &mut impl QuestionLink) -> bool {
        if self.is_loading || self.draft.trim().is_empty() {
            return false;
        }
        let text = std::mem::take(&mut self.draft);
        self.send_message(&text, link)
    }

    pub fn set_sidebar(&mut self, visible: bool) {
        self.show_sidebar = visible;
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }

    fn notify(&self) {
        self.changed.send_replace(Revision { generation: self.generation, len: self.messages.len() });
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
