use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, send_response, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_network::pasv::DataChannel;
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the STOR (Store) FTP command.
///
/// Receives the file over the passive data connection until the client
/// closes it, creating or truncating the target. Bytes are stored as
/// received whatever the transfer type.
///
/// # Returns
///
/// `226` once the upload is on disk; `503` without PASV, `550` for a target
/// outside the root or one that is a directory, `426` if the transfer breaks.
pub async fn handle_stor_command(
    writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::STOR)?;
    let mut channel = session.data_channel.take().ok_or(FtpError::NoDataChannel)?;
    let result = receive_file(writer, session, &mut channel, path).await;
    channel.close_all().await;
    result
}

async fn receive_file(
    writer: &mut ControlWriter,
    session: &Session,
    channel: &mut DataChannel,
    path: &str,
) -> FtpResult<Response> {
    let target = session.sandbox.resolve_for_write(path)?;

    send_response(
        writer,
        &Response::new(
            response::OPENING_DATA,
            format!("Ok to send data for {}", path),
        ),
    )
    .await?;

    let stream = channel.accept_once().await.map_err(FtpError::DataConnection)?;
    let written = session.sandbox.write(&target, stream).await?;

    info!("Received file {} ({} bytes) from {}", path, written, session.peer_addr);
    Ok(Response::new(response::TRANSFER_COMPLETE, "Transfer complete"))
}
