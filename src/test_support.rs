//! Helpers shared by the async tests: local backends on ephemeral ports.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use tokio::net::TcpListener;

use crate::protocol::ASK_PATH;

/// Start the echo backend on `127.0.0.1:0` and return its address.
pub async fn spawn_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(crate::backend::run(listener));
    addr
}

/// Start a backend that answers every frame with the given raw replies, in order.
pub async fn spawn_scripted_backend(replies: Vec<String>) -> SocketAddr {
    let app = Router::new().route(
        ASK_PATH,
        get(move |ws: WebSocketUpgrade| {
            let replies = replies.clone();
            async move { ws.on_upgrade(move |socket| scripted(socket, replies)) }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

/// Start a backend that closes every connection right after the handshake.
pub async fn spawn_hangup_backend() -> SocketAddr {
    let app = Router::new().route(
        ASK_PATH,
        get(|ws: WebSocketUpgrade| async move {
            ws.on_upgrade(|mut socket| async move {
                let _ = socket.send(Message::Close(None)).await;
            })
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

/// Address of a port with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr")
}

pub fn ask_url(addr: SocketAddr) -> String {
    format!("ws://{addr}{ASK_PATH}")
}

async fn scripted(mut socket: WebSocket, replies: Vec<String>) {
    let mut replies = replies.into_iter();
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(_) => {
                let Some(reply) = replies.next() else { break };
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}
