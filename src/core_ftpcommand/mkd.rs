use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the MKD FTP command.
///
/// Missing intermediate directories are created as well.
///
/// # Returns
///
/// `257 "<created path>"`, or `550` when the path already exists or falls
/// outside the root.
pub async fn handle_mkd_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::MKD)?;
    let created = session.sandbox.make_dir(path)?;
    info!("Directory created: {}", created);

    Ok(Response::new(
        response::PATH_CREATED,
        format!("\"{}\" directory created", created),
    ))
}
