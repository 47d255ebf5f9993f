use crate::constants::SYSTEM_TYPE;
use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the SYST (System) FTP command.
///
/// # Returns
///
/// `215` with the fixed system type, whatever the host actually runs.
pub async fn handle_syst_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    _session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    info!("Responding to SYST command with system type.");
    Ok(Response::new(response::SYSTEM_TYPE, SYSTEM_TYPE))
}
