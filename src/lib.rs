//! Chat front-end core for the procurement assistant.
//!
//! SYSTEM CONTEXT
//! ==============
//! A conversation store and a single WebSocket channel exchange
//! `{"question"}` / `{"answer"}` frames with an external backend at
//! `/chats/ask`. `ChatView` binds the two for the lifetime of one view;
//! `render` and the binary's `chat` command are the presentation layer,
//! and `backend` is an echo server for local runs and tests.

pub mod backend;
pub mod config;
pub mod net;
pub mod protocol;
pub mod render;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_support;
