// src/core_ftpcommand/pwd.rs
use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

/// Replies with the working directory relative to the sandbox root, always
/// with `/` separators.
pub async fn handle_pwd_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    Ok(Response::new(
        response::PATH_CREATED,
        format!("\"{}\" is the current directory", session.sandbox.pwd()),
    ))
}
