//! covbadge server library
//!
//! HTTP service and CLI around the `covbadge` core: clients upload Go
//! cover profiles per repository and fetch a coverage badge for each.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod shield;

pub use commands::{BadgeUrlArgs, Cli, Commands, PercentArgs};
pub use config::{DisplayMode, ServerConfig, DEFAULT_CONFIG_FILE};
pub use error::{ServerError, ServerResult};
pub use logging::LogFormat;
pub use server::{router, serve, AppState};
pub use shield::{BadgeRenderer, RenderedBadge, ShieldClient, SVG_CONTENT_TYPE};
