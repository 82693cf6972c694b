use std::io::{self, Write};

use clap::{Parser, Subcommand};
use procurement_chat::backend;
use procurement_chat::config::{BackendConfig, ClientConfig, ConfigError};
use procurement_chat::net::ChannelState;
use procurement_chat::render::Transcript;
use procurement_chat::view::{ChatView, ViewEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "procurement-chat", about = "Procurement assistant chat client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open an interactive conversation with the backend.
    Chat {
        /// Backend base URL; falls back to `PROCUREMENT_WS_URL`, then `ws://localhost:9000`.
        #[arg(long)]
        ws_url: Option<String>,
    },
    /// Run the development echo backend.
    Serve {
        #[arg(long, env = "PROCUREMENT_PORT")]
        port: Option<u16>,
    },
}

/// Slash commands understood by the chat prompt.
const MENU: &str = "/new   start a new conversation\n/menu  toggle this menu\n/quit  leave";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    // Loaded before the subscriber so `.env` can set RUST_LOG.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!(".env not found, using process environment"),
        Err(e) => warn!(error = %e, ".env could not be parsed"),
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Chat { ws_url } => {
            let config = match ws_url {
                Some(url) => ClientConfig::new(&url)?,
                None => ClientConfig::from_env()?,
            };
            run_chat(config).await
        }
        Command::Serve { port } => {
            let mut config = BackendConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            backend::serve(&config).await?;
            Ok(())
        }
    }
}

async fn run_chat(config: ClientConfig) -> Result<(), CliError> {
    let mut view = ChatView::mount(&config).await;
    let result = chat_loop(&mut view).await;
    view.unmount().await;
    result
}

async fn chat_loop(view: &mut ChatView) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    let mut transcript = Transcript::new();
    let mut updates = view.store().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    transcript.render(view.store(), &mut stdout)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "/quit" => break,
                    "/new" => view.reset(),
                    "/menu" => {
                        view.toggle_sidebar();
                        if view.store().show_sidebar() {
                            writeln!(stdout, "{MENU}")?;
                        }
                    }
                    text => {
                        view.set_draft(text);
                        view.submit_draft();
                    }
                }
            }
            event = view.next_event(), if view.channel_state() == ChannelState::Open => {
                match event {
                    Ok(ViewEvent::Answer(_)) => {}
                    Ok(ViewEvent::Closed) => info!("chat: backend connection closed"),
                    Err(e) => error!(error = %e, "chat: dropped answer"),
                }
            }
            Ok(()) = updates.changed() => {
                transcript.render(view.store(), &mut stdout)?;
            }
        }
    }
    Ok(())
}
