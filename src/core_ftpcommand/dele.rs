use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the DELE FTP command.
///
/// # Returns
///
/// `250` once the file is gone, `550` if it is missing or is not a regular
/// file.
pub async fn handle_dele_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::DELE)?;
    session.sandbox.remove_file(path)?;
    info!("File deleted: {}", path);

    Ok(Response::new(response::FILE_ACTION_OK, "File deleted"))
}
