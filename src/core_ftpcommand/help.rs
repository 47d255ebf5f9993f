use crate::core_error::FtpResult;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;

const VERBS_PER_LINE: usize = 8;

/// Handles the HELP FTP command.
///
/// Without arguments, lists every recognized verb. With a verb there is no
/// per-command help, so the reply says so.
pub async fn handle_help_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    _session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    if !args.is_empty() {
        let topic = args.join(" ").to_ascii_uppercase();
        return Ok(Response::multi(
            response::HELP_MESSAGE,
            format!("No detailed help available for {}", topic),
            Vec::new(),
            "Help OK",
        ));
    }

    let lines = FtpCommand::ALL
        .chunks(VERBS_PER_LINE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|c| format!("{:<5}", c.as_str()))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect();

    Ok(Response::multi(
        response::HELP_MESSAGE,
        "The following commands are recognized:",
        lines,
        "Help OK",
    ))
}
