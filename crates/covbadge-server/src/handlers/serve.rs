//! `covbadge serve`

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::server;
use std::path::Path;

/// Load configuration and run the service until interrupted
///
/// Any configuration problem ends the process before a port is bound.
pub fn execute_serve(config_path: &Path) -> ServerResult<()> {
    let config = ServerConfig::load(config_path).inspect_err(|e| {
        tracing::error!(path = %config_path.display(), error = %e, "cannot start");
    })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(config))
}
