use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the RNTO (Rename To) FTP command.
///
/// The pending source is consumed whatever the outcome, so a failed RNTO
/// needs a fresh RNFR.
///
/// # Returns
///
/// `250` on success, `503` without a prior RNFR, `550` if the rename fails.
pub async fn handle_rnto_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let path = required_arg(args, FtpCommand::RNTO)?;
    let source = session
        .rename_from
        .take()
        .ok_or(FtpError::BadSequence("use RNFR first"))?;

    let destination = session.sandbox.rename_to(&source, path)?;
    info!("Renamed {} to {}", session.sandbox.display_path(&source), destination);

    Ok(Response::new(response::FILE_ACTION_OK, "Rename successful"))
}
