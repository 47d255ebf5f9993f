use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the RMD FTP command. Only empty directories are removed, and never
/// the root itself.
pub async fn handle_rmd_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::RMD)?;
    session.sandbox.remove_dir(path)?;
    info!("Directory removed: {}", path);

    Ok(Response::new(response::FILE_ACTION_OK, "Directory removed"))
}
