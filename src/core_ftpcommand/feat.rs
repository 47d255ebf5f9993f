use crate::core_error::FtpResult;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

/// Extensions advertised in the FEAT block.
pub const FEATURES: [&str; 2] = ["PASV", "SIZE"];

/// Handles the FEAT (Feature) FTP command.
///
/// # Returns
///
/// A `211` multi-line block, one supported extension per line.
pub async fn handle_feat_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    _session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    let lines = FEATURES.iter().map(|f| f.to_string()).collect();
    Ok(Response::multi(response::SYSTEM_STATUS, "Features:", lines, "End"))
}
