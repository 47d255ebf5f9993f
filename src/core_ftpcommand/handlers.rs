use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::response::Response;
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, help, list, mkd, noop, pass, pwd, quit, retr, rmd, rnfr, rnto, size,
    stor, syst, type_, user,
};
use crate::core_log::logger;
use crate::core_network::pasv;
use crate::session::Session;
use crate::Config;
use log::{debug, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// The control connection as seen by command handlers.
pub type ControlWriter = dyn AsyncWrite + Unpin + Send;

/// What the control loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Writes one reply (or multi-line block) on the control connection.
pub async fn send_response(writer: &mut ControlWriter, response: &Response) -> FtpResult<()> {
    writer
        .write_all(response.render().as_bytes())
        .await
        .map_err(FtpError::Control)?;
    writer.flush().await.map_err(FtpError::Control)?;
    debug!("Sent: {}", response);
    Ok(())
}

/// Splits a command line into the upper-cased verb and its arguments.
/// Returns `None` for a blank line.
pub fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_uppercase();
    Some((verb, words.map(String::from).collect()))
}

/// The single argument of a verb whose arity is `Exact(1)`.
pub fn required_arg(args: &[String], command: FtpCommand) -> FtpResult<&str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| FtpError::SyntaxError(command.as_str().to_string()))
}

/// Runs one command line and writes exactly one final reply.
///
/// Domain errors become their FTP reply. Only a failure on the control
/// connection itself is returned, and it ends the session.
pub async fn dispatch(
    writer: &mut ControlWriter,
    config: &Config,
    session: &mut Session,
    line: &str,
) -> FtpResult<Flow> {
    let (verb, args) = match parse_line(line) {
        Some(parsed) => parsed,
        None => return Ok(Flow::Continue),
    };

    let command = FtpCommand::from_str(&verb);
    let outcome = match command {
        Some(command) => run(command, writer, config, session, &args).await,
        None if !session.authenticated => Err(FtpError::NotLoggedIn),
        None => Err(FtpError::UnknownCommand(verb.clone())),
    };

    let response = match outcome {
        Ok(response) => response,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            if e.is_security_violation() {
                logger::critical(format!(
                    "{} from {} rejected: {}",
                    verb, session.peer_addr, e
                ));
            } else {
                warn!("{} from {} failed: {}", verb, session.peer_addr, e);
            }
            e.to_ftp_response()
        }
    };

    send_response(writer, &response).await?;

    Ok(match command {
        Some(FtpCommand::QUIT) => Flow::Quit,
        _ => Flow::Continue,
    })
}

async fn run(
    command: FtpCommand,
    writer: &mut ControlWriter,
    config: &Config,
    session: &mut Session,
    args: &[String],
) -> FtpResult<Response> {
    if !session.authenticated && !command.allowed_before_login() {
        return Err(FtpError::NotLoggedIn);
    }
    if !command.arity().accepts(args.len()) {
        return Err(FtpError::SyntaxError(command.as_str().to_string()));
    }

    match command {
        FtpCommand::USER => user::handle_user_command(writer, config, session, args).await,
        FtpCommand::PASS => pass::handle_pass_command(writer, config, session, args).await,
        FtpCommand::QUIT => quit::handle_quit_command(writer, config, session, args).await,
        FtpCommand::NOOP => noop::handle_noop_command(writer, config, session, args).await,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, config, session, args).await,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, config, session, args).await,
        FtpCommand::CDUP => cdup::handle_cdup_command(writer, config, session, args).await,
        FtpCommand::MKD => mkd::handle_mkd_command(writer, config, session, args).await,
        FtpCommand::RMD => rmd::handle_rmd_command(writer, config, session, args).await,
        FtpCommand::DELE => dele::handle_dele_command(writer, config, session, args).await,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(writer, config, session, args).await,
        FtpCommand::RNTO => rnto::handle_rnto_command(writer, config, session, args).await,
        FtpCommand::SIZE => size::handle_size_command(writer, config, session, args).await,
        FtpCommand::TYPE => type_::handle_type_command(writer, config, session, args).await,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, config, session, args).await,
        FtpCommand::LIST => list::handle_list_command(writer, config, session, args).await,
        FtpCommand::NLST => list::handle_nlst_command(writer, config, session, args).await,
        FtpCommand::RETR => retr::handle_retr_command(writer, config, session, args).await,
        FtpCommand::STOR => stor::handle_stor_command(writer, config, session, args).await,
        FtpCommand::FEAT => feat::handle_feat_command(writer, config, session, args).await,
        FtpCommand::HELP => help::handle_help_command(writer, config, session, args).await,
        FtpCommand::SYST => syst::handle_syst_command(writer, config, session, args).await,
    }
}
