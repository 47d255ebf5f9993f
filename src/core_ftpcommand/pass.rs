use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_log::logger;
use crate::session::Session;
use crate::Config;
use log::warn;

/// Handles the PASS FTP command.
///
/// Compares the pending username and this password with the configured
/// credentials. A mismatch clears the pending username so the client has to
/// start over with USER.
///
/// # Returns
///
/// * `230` on success.
/// * `530` on a credential mismatch.
/// * `503` when no USER came first.
/// * `202` when the session is already logged in.
pub async fn handle_pass_command(
    _writer: &mut ControlWriter,
    config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let password = required_arg(args, FtpCommand::PASS)?;

    if session.authenticated {
        return Err(FtpError::AlreadyLoggedIn);
    }

    let username = session.pending_username.take().ok_or(FtpError::UserRequired)?;

    if username == config.server.username && password == config.server.password {
        session.authenticated = true;
        logger::success(format!("User {} logged in from {}", username, session.peer_addr));
        Ok(Response::new(response::LOGGED_IN, "User logged in. Proceed"))
    } else {
        warn!("Failed login for user {} from {}", username, session.peer_addr);
        Err(FtpError::LoginFailed(username))
    }
}
