use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{required_arg, ControlWriter};
use crate::core_ftpcommand::response::{self, Response};
use crate::core_sandbox::TransferType;
use crate::session::Session;
use crate::Config;
use log::debug;

/// Handles the TYPE FTP command.
///
/// Only `A` (ASCII) and `I` (binary) are supported, in either case. The
/// selected type applies to every following RETR.
///
/// # Returns
///
/// `200` with the new type, `504` for any other representation type.
pub async fn handle_type_command(
    _writer: &mut ControlWriter,
    _config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    let param = required_arg(args, FtpCommand::TYPE)?;
    let transfer_type = TransferType::from_param(param)
        .ok_or_else(|| FtpError::UnsupportedType(param.to_string()))?;

    session.transfer_type = transfer_type;
    debug!("Transfer type set to {:?}", transfer_type);

    Ok(Response::new(
        response::OK,
        format!("Type set to {}", transfer_type.code()),
    ))
}
