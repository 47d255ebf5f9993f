use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, send_response, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_network::pasv::DataChannel;
use crate::core_sandbox::TransferType;
use crate::session::Session;
use crate::Config;
use log::info;
use tokio::io::AsyncWriteExt;

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams the file over the passive data connection in fixed-size chunks.
/// Under `TYPE A` bare line feeds go out as CRLF; under `TYPE I` the bytes
/// are sent untouched.
///
/// # Arguments
///
/// * `writer` - The control connection, used for the 150 preliminary reply.
/// * `_config` - The server configuration (not used in this command).
/// * `session` - The session holding the sandbox, transfer type and data channel.
/// * `args` - The name of the file to retrieve.
///
/// # Returns
///
/// `226` once the whole file was sent; `503` without PASV, `550` for a missing
/// file or a path outside the root, `425`/`426` on data connection failures.
pub async fn handle_retr_command(
    writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::RETR)?;
    let mut channel = session.data_channel.take().ok_or(FtpError::NoDataChannel)?;
    let result = send_file(writer, session, &mut channel, path).await;
    channel.close_all().await;
    result
}

async fn send_file(
    writer: &mut ControlWriter,
    session: &Session,
    channel: &mut DataChannel,
    path: &str,
) -> FtpResult<Response> {
    let mut chunks = session.sandbox.read(path, session.transfer_type).await?;

    let mode = match session.transfer_type {
        TransferType::Ascii => "ASCII",
        TransferType::Image => "BINARY",
    };
    send_response(
        writer,
        &Response::new(
            response::OPENING_DATA,
            format!("Opening {} mode data connection for {}", mode, path),
        ),
    )
    .await?;

    let stream = channel.accept_once().await.map_err(FtpError::DataConnection)?;
    let mut sent = 0u64;
    while let Some(chunk) = chunks.next_chunk().await? {
        stream.write_all(&chunk).await.map_err(FtpError::Transfer)?;
        sent += chunk.len() as u64;
    }
    stream.flush().await.map_err(FtpError::Transfer)?;

    info!("Sent file {} ({} bytes) to {}", path, sent, session.peer_addr);
    Ok(Response::new(response::TRANSFER_COMPLETE, "Transfer complete"))
}
