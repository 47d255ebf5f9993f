use crate::core_log::logger;
use crate::core_network::network;
use crate::Config;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server until the listener fails or Ctrl-C is received.
///
/// # Arguments
///
/// * `config` - The validated server configuration. It is shared read-only
///   with every session.
pub async fn run(config: Config) -> Result<()> {
    info!(
        "Starting server on {}:{} for user {} with root {}",
        config.server.bind_address,
        config.server.listen_port,
        config.server.username,
        config.server.root_dir.display()
    );
    if let Some(pasv) = config.server.pasv_address {
        info!("Advertising {} in PASV replies", pasv);
    }

    let config = Arc::new(config);

    tokio::select! {
        result = network::start_server(config) => {
            if let Err(e) = &result {
                error!("Server stopped: {:#}", e);
            }
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            logger::success("Shutdown requested, no longer accepting connections");
            Ok(())
        }
    }
}
