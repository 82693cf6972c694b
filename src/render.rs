//! Line-oriented rendering of the conversation for the terminal front-end.
//!
//! The transcript remembers how many messages it has already written, so each
//! scroll-to-end notification only prints the new tail. A change in the
//! store's reset generation means the conversation is redrawn from the top.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::{self, Write};

use crate::state::chat::{ChatMessage, ConversationStore};

pub const USER_PREFIX: &str = "you";
pub const BOT_PREFIX: &str = "assistant";
pub const LOADING_LINE: &str = "assistant> ...";
pub const RESET_LINE: &str = "--- new conversation ---";

#[derive(Debug, Default)]
pub struct Transcript {
    generation: u64,
    rendered: usize,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every message not yet shown, followed by the loading line if a
    /// question is in flight.
    pub fn render(&mut self, store: &ConversationStore, out: &mut impl Write) -> io::Result<()> {
        let messages = store.messages();
        if store.generation() != self.generation || messages.len() < self.rendered {
            if self.rendered > 0 {
                writeln!(out, "{RESET_LINE}")?;
            }
            self.generation = store.generation();
            self.rendered = 0;
        }
        for message in &messages[self.rendered..] {
            write_message(message, out)?;
        }
        self.rendered = messages.len();
        if store.is_loading() {
            writeln!(out, "{LOADING_LINE}")?;
        }
        out.flush()
    }
}

fn write_message(message: &ChatMessage, out: &mut impl Write) -> io::Result<()> {
    let prefix = if message.is_bot { BOT_PREFIX } else { USER_PREFIX };
    let mut lines = message.text.trim().lines();
    let first = lines.next().unwrap_or_default();
    writeln!(out, "{prefix}> {first}")?;
    // Continuation lines are indented under the prefix.
    let pad = " ".repeat(prefix.len() + 2);
    for line in lines {
        writeln!(out, "{pad}{line}")?;
    }
    Ok(())
}
