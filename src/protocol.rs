//! Wire model for the question/answer WebSocket protocol.
//!
//! Every frame is a single JSON text message. The client sends
//! `{"question": "..."}` and the backend replies with `{"answer": "..."}`.
//! There are no message IDs: exactly one answer follows each question.

use serde::{Deserialize, Serialize};

/// Fixed endpoint path for the ask channel, appended to the configured base URL.
pub const ASK_PATH: &str = "/chats/ask";

/// Error returned when a text frame does not match the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON, or was missing the expected field.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client → server frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
}

/// Server → client frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
}

/// Encode a question as a JSON text frame.
#[must_use]
pub fn encode_question(text: &str) -> String {
    encode(&Question { question: text.to_owned() })
}

/// Encode an answer as a JSON text frame.
#[must_use]
pub fn encode_answer(text: &str) -> String {
    encode(&Answer { answer: text.to_owned() })
}

/// Decode an inbound answer frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if the text is not JSON or lacks a
/// string `answer` field.
pub fn decode_answer(text: &str) -> Result<Answer, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode an inbound question frame.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if the text is not JSON or lacks a
/// string `question` field.
pub fn decode_question(text: &str) -> Result<Question, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

fn encode<T: Serialize>(frame: &T) -> String {
    // Both frame types are a single string field; serialization cannot fail.
    serde_json::to_string(frame).unwrap_or_default()
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
