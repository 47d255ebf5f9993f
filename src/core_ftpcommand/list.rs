use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::handlers::{send_response, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_network::pasv::DataChannel;
use crate::core_sandbox::format_listing;
use crate::session::Session;
use crate::Config;
use log::info;
use tokio::io::AsyncWriteExt;

/// Handles the LIST FTP command.
///
/// Sends the long listing of a directory, a single file or the matches of a
/// glob pattern over the passive data connection. Client flags such as `-la`
/// are ignored.
///
/// # Arguments
///
/// * `writer` - The control connection, used for the 150 preliminary reply.
/// * `_config` - The server configuration (not used in this command).
/// * `session` - The session holding the sandbox and the open data channel.
/// * `args` - An optional path or pattern.
///
/// # Returns
///
/// `226` after the listing was sent; `503` without PASV, `550` for a path
/// outside the root, `426` if the data connection fails.
pub async fn handle_list_command(
    writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    transfer_listing(writer, session, args, false).await
}

/// Handles the NLST FTP command. Same as LIST with bare names.
pub async fn handle_nlst_command(
    writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    transfer_listing(writer, session, args, true).await
}

async fn transfer_listing(
    writer: &mut ControlWriter,
    session: &mut Session,
    args: &[String],
    names_only: bool,
) -> FtpResult<Response> {
    let path = args
        .first()
        .map(String::as_str)
        .filter(|arg| !arg.starts_with('-'));

    let mut channel = session.data_channel.take().ok_or(FtpError::NoDataChannel)?;
    let result = send_listing(writer, session, &mut channel, path, names_only).await;
    channel.close_all().await;
    result
}

async fn send_listing(
    writer: &mut ControlWriter,
    session: &Session,
    channel: &mut DataChannel,
    path: Option<&str>,
    names_only: bool,
) -> FtpResult<Response> {
    let entries = session.sandbox.list(path)?;
    let listing = format_listing(&entries, names_only);

    send_response(
        writer,
        &Response::new(
            response::OPENING_DATA,
            "Here comes the directory listing",
        ),
    )
    .await?;

    let stream = channel.accept_once().await.map_err(FtpError::DataConnection)?;
    stream
        .write_all(listing.as_bytes())
        .await
        .map_err(FtpError::Transfer)?;
    stream.flush().await.map_err(FtpError::Transfer)?;

    info!(
        "Sent listing of {} ({} entries) to {}",
        path.unwrap_or("."),
        entries.len(),
        session.peer_addr
    );
    Ok(Response::new(response::TRANSFER_COMPLETE, "Directory send OK"))
}
