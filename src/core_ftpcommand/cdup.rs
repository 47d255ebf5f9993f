use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::debug;

/// Handles the CDUP FTP command: moves to the parent of the working
/// directory, never above the sandbox root.
pub async fn handle_cdup_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    session.sandbox.change_dir_up()?;
    debug!("CDUP: now in {}", session.sandbox.pwd());

    Ok(Response::new(
        response::FILE_ACTION_OK,
        format!("Directory successfully changed to \"{}\"", session.sandbox.pwd()),
    ))
}
