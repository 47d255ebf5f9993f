use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::info;

/// Handles the USER FTP command.
///
/// Records the username and asks for the password. Sending USER again simply
/// replaces the pending name.
///
/// # Arguments
///
/// * `writer` - The control connection (not used in this command).
/// * `_config` - The server configuration (not used in this command).
/// * `session` - The session receiving the pending username.
/// * `args` - The username provided by the client.
///
/// # Returns
///
/// `331` asking for the password.
pub async fn handle_user_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let username = required_arg(args, FtpCommand::USER)?;
    info!("Received USER command with username: {}", username);

    session.pending_username = Some(username.to_string());

    Ok(Response::new(
        response::NEED_PASSWORD,
        format!("Username '{}' OK. Need password", username),
    ))
}
