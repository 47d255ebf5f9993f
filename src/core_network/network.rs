use crate::constants::{ACCEPT_BACKOFF_INITIAL_MS, ACCEPT_BACKOFF_MAX_MS, GREETING};
use crate::core_ftpcommand::handlers::{dispatch, send_response, Flow};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_log::logger;
use crate::core_sandbox::PathSandbox;
use crate::session::Session;
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

/// Binds the control listener from the configuration and serves it.
pub async fn start_server(config: Arc<Config>) -> Result<()> {
    let addr = SocketAddr::new(config.server.bind_address, config.server.listen_port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind control listener on {}", addr))?;

    logger::success(format!(
        "Server listening on {}, serving {}",
        listener.local_addr()?,
        config.server.root_dir.display()
    ));

    serve(listener, config).await
}

/// Accept loop: one task per control connection.
///
/// Accept errors (descriptor exhaustion and the like) are logged and retried
/// after an exponentially growing pause, reset by the next success.
pub async fn serve(listener: TcpListener, config: Arc<Config>) -> Result<()> {
    let mut failures: u32 = 0;
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                let delay = accept_retry_delay(failures);
                failures = failures.saturating_add(1);
                error!(
                    "Failed to accept connection: {} (retrying in {} ms)",
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                continue;
            }
        };
        failures = 0;
        info!("New connection from {}", addr);

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config).await {
                error!("Connection error for {}: {:#}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Serves one control connection until QUIT, EOF or a control-channel error.
pub async fn handle_connection(socket: TcpStream, config: Arc<Config>) -> Result<()> {
    let peer_addr = socket.peer_addr()?;
    let local_ip = socket.local_addr()?.ip();
    let sandbox = PathSandbox::new(&config.server.root_dir)
        .with_context(|| format!("Cannot open root {}", config.server.root_dir.display()))?;
    let mut session = Session::new(sandbox, local_ip, peer_addr);

    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let result = control_loop(&mut reader, &mut writer, &config, &mut session).await;

    session.teardown().await;
    result
}

async fn control_loop(
    reader: &mut BufReader<OwnedReadHalf>,
    writer: &mut OwnedWriteHalf,
    config: &Config,
    session: &mut Session,
) -> Result<()> {
    send_response(writer, &Response::new(response::SERVICE_READY, GREETING)).await?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let n = reader.read_until(b'\n', &mut buffer).await?;
        if n == 0 {
            warn!("Connection closed by client {} without QUIT", session.peer_addr);
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("Received command: [{}] from {}", loggable(line), session.peer_addr);

        if dispatch(writer, config, session, line).await? == Flow::Quit {
            info!("Connection closed for client {} upon QUIT", session.peer_addr);
            return Ok(());
        }
    }
}

/// Pause before the next accept after `failures` consecutive failed ones.
fn accept_retry_delay(failures: u32) -> Duration {
    let delay = ACCEPT_BACKOFF_INITIAL_MS
        .checked_shl(failures.min(16))
        .unwrap_or(ACCEPT_BACKOFF_MAX_MS);
    Duration::from_millis(delay.min(ACCEPT_BACKOFF_MAX_MS))
}

/// The command line with any password masked.
fn loggable(line: &str) -> &str {
    match line.get(..4) {
        Some(verb) if verb.eq_ignore_ascii_case("PASS") => "PASS ****",
        _ => line,
    }
}
