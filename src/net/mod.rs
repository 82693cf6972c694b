//! Network layer: the WebSocket channel to the procurement backend.

pub mod transport;

pub use transport::{ChannelState, TransportChannel, TransportError};
