//! Settings parsed from environment variables.

use crate::protocol::ASK_PATH;

pub const DEFAULT_WS_URL: &str = "ws://localhost:9000";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_PURCHASES_COLLECTION: &str = "purchases";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("websocket URL must start with ws:// or wss://: {0}")]
    InvalidWsUrl(String),
    #[error("invalid {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Client-side connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without a trailing slash.
    pub ws_base_url: String,
}

impl ClientConfig {
    /// Build client config from environment variables.
    ///
    /// Optional:
    /// - `PROCUREMENT_WS_URL`: default `ws://localhost:9000`
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("PROCUREMENT_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_owned());
        Self::new(&raw)
    }

    /// Validate and normalize a base URL.
    pub fn new(ws_base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = ws_base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("ws://") || trimmed.starts_with("wss://")) {
            return Err(ConfigError::InvalidWsUrl(ws_base_url.to_owned()));
        }
        Ok(Self { ws_base_url: trimmed.to_owned() })
    }

    /// Full URL of the ask endpoint.
    #[must_use]
    pub fn ask_url(&self) -> String {
        format!("{}{ASK_PATH}", self.ws_base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { ws_base_url: DEFAULT_WS_URL.to_owned() }
    }
}

/// Settings for the development echo backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub port: u16,
    /// Name of the purchases collection used by the storage collaborator.
    pub purchases_collection: String,
}

impl BackendConfig {
    /// Build backend config from environment variables.
    ///
    /// Optional:
    /// - `PROCUREMENT_PORT`: default 9000
    /// - `PURCHASES_COLLECTION`: default `purchases`
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PROCUREMENT_PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };
        let purchases_collection = std::env::var("PURCHASES_COLLECTION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PURCHASES_COLLECTION.to_owned());

        Ok(Self { port, purchases_collection })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, purchases_collection: DEFAULT_PURCHASES_COLLECTION.to_owned() }
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidNumber { var: "PROCUREMENT_PORT", value: raw.to_owned() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
