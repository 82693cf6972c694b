//! Development echo backend for the ask endpoint.
//!
//! DESIGN
//! ======
//! Speaks the server side of the question/answer protocol and answers every
//! question with its own text. It stands in for the procurement-data service
//! so the chat client can be run and tested without one.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade on `GET /chats/ask`
//! 2. Each `{"question"}` text frame → one `{"answer"}` text frame
//! 3. Malformed frames are logged and skipped
//! 4. Close or socket error ends the connection

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::net::SocketAddr;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::protocol::{self, ASK_PATH};

/// Router with the ask endpoint and a plain-text health route.
pub fn router() -> Router {
    Router::new()
        .route(ASK_PATH, get(handle_ask))
        .route("/", get(healthz))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured port on all interfaces and serve until the process exits.
///
/// # Errors
///
/// Returns the I/O error if the port cannot be bound or the server fails.
pub async fn serve(config: &BackendConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;
    info!(port = config.port, collection = %config.purchases_collection, "backend listening");
    run(listener).await
}

/// Serve on an already bound listener.
///
/// # Errors
///
/// Returns the I/O error if the server fails.
pub async fn run(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_ask(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(run_ask)
}

async fn run_ask(mut socket: WebSocket) {
    info!("ask: client connected");

    while let Some(msg) = socket.recv().await {
        let Ok(msg) = msg else { break };
        match msg {
            Message::Text(text) => {
                let Some(reply) = answer_for(text.as_str()) else {
                    continue;
                };
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("ask: client disconnected");
}

/// Reply frame for one inbound text frame, or `None` if it is malformed.
fn answer_for(text: &str) -> Option<String> {
    match protocol::decode_question(text) {
        Ok(q) => Some(protocol::encode_answer(&q.question)),
        Err(e) => {
            warn!(error = %e, "ask: invalid inbound frame");
            None
        }
    }
}
