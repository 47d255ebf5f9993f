use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the QUIT FTP command. The control loop ends once the 221 reply
/// has been written.
pub async fn handle_quit_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    info!("Received QUIT command from {}. Closing connection.", session.peer_addr);
    Ok(Response::new(response::CLOSING_CONTROL, "Goodbye"))
}
