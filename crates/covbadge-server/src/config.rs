//! Server configuration
//!
//! Read once at startup from a JSON file:
//!
//! ```json
//! {
//!   "listenPort": "8080",
//!   "shieldServerURL": "https://img.shields.io/badge"
//! }
//! ```
//!
//! Only the two keys above are required; everything else has a default.

use crate::error::{ServerError, ServerResult};
use covbadge::Selection;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "conf.json";

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How `/display` answers once the badge is known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Fetch the image from the badge service and relay it
    #[default]
    Proxy,
    /// Send the client to the badge service
    Redirect,
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// TCP port, kept as text the way the file carries it
    pub listen_port: String,
    /// Base URL of the badge rendering service
    #[serde(rename = "shieldServerURL")]
    pub shield_server_url: String,
    /// Interface to bind
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Root directory for stored profiles
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Which files of a multi-file report count
    #[serde(default)]
    pub aggregation: Selection,
    /// Relay or redirect on `/display`
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Timeout for badge service requests
    #[serde(default = "default_shield_timeout_secs")]
    pub shield_timeout_secs: u64,
    /// Upper bound on handling a single request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Largest accepted upload body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_shield_timeout_secs() -> u64 {
    10
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl ServerConfig {
    /// Configuration with defaults for everything but the required keys
    #[must_use]
    pub fn new(listen_port: impl Into<String>, shield_server_url: impl Into<String>) -> Self {
        Self {
            listen_port: listen_port.into(),
            shield_server_url: shield_server_url.into(),
            listen_address: default_listen_address(),
            storage_dir: default_storage_dir(),
            aggregation: Selection::default(),
            display_mode: DisplayMode::default(),
            shield_timeout_secs: default_shield_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }

    /// Read and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&text).map_err(|e| match e {
            ServerError::Config { message } => {
                ServerError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(text: &str) -> ServerResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ServerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> ServerResult<()> {
        let _ = self.port()?;
        let _ = self.socket_addr()?;
        if self.shield_server_url.trim().is_empty() {
            return Err(ServerError::config("shieldServerURL must not be empty"));
        }
        if self.shield_timeout_secs == 0 {
            return Err(ServerError::config("shieldTimeoutSecs must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::config("requestTimeoutSecs must be positive"));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::config("maxUploadBytes must be positive"));
        }
        Ok(())
    }

    /// Listen port as a number
    pub fn port(&self) -> ServerResult<u16> {
        self.listen_port.trim().parse().map_err(|_| {
            ServerError::config(format!("invalid listenPort {:?}", self.listen_port))
        })
    }

    /// Address to bind
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self.listen_address.parse().map_err(|_| {
            ServerError::config(format!("invalid listenAddress {:?}", self.listen_address))
        })?;
        Ok(SocketAddr::new(ip, self.port()?))
    }

    /// Badge service base URL without a trailing slash
    #[must_use]
    pub fn shield_url(&self) -> &str {
        self.shield_server_url.trim_end_matches('/')
    }

    /// Badge service request timeout
    #[must_use]
    pub const fn shield_timeout(&self) -> Duration {
        Duration::from_secs(self.shield_timeout_secs)
    }

    /// Per-request handling timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
