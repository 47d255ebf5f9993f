use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

/// Handles the CWD FTP command.
///
/// # Arguments
///
/// * `writer` - The control connection (not used in this command).
/// * `_config` - The server configuration (not used in this command).
/// * `session` - The session whose working directory changes.
/// * `args` - The target directory, absolute from the sandbox root or relative
///   to the working directory.
///
/// # Returns
///
/// `250` once the directory is entered, `550` when it is missing, is not a
/// directory or lies outside the root.
pub async fn handle_cwd_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::CWD)?;
    session.sandbox.change_dir(path)?;

    Ok(Response::new(
        response::FILE_ACTION_OK,
        format!("Directory successfully changed to \"{}\"", session.sandbox.pwd()),
    ))
}
