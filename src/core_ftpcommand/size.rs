use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

/// Handles the SIZE FTP command: `213 <bytes>` for a regular file.
pub async fn handle_size_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::SIZE)?;
    let size = session.sandbox.file_size(path)?;

    Ok(Response::new(response::FILE_STATUS, size.to_string()))
}
