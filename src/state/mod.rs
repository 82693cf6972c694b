//! Client-side conversation state.
//!
//! DESIGN
//! ======
//! The store owns all mutable chat state and never touches the socket
//! directly; it forwards questions through the `QuestionLink` seam so it can
//! be driven by a live channel or by an in-memory link in tests.

pub mod chat;
