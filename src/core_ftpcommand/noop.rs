use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

pub async fn handle_noop_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    _session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    Ok(Response::new(response::OK, "OK, n00p n00p !"))
}
