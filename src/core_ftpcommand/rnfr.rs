use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::debug;

/// Handles the RNFR (Rename From) FTP command.
///
/// Stores the canonical source in the session until the matching RNTO. A
/// later RNFR replaces it.
///
/// # Returns
///
/// `350` when the source exists inside the root, `550` otherwise.
pub async fn handle_rnfr_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::RNFR)?;
    let source = session.sandbox.rename_from(path)?;
    debug!("RNFR source set to {:?}", source);
    session.rename_from = Some(source);

    Ok(Response::new(
        response::PENDING_FURTHER_INFO,
        "File exists, ready for destination name",
    ))
}
