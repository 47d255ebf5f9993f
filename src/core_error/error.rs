// Error kinds raised while serving a command
use crate::core_ftpcommand::response::{self, Response};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Command {0:?} not implemented")]
    UnknownCommand(String),

    #[error("Wrong number of arguments for {0}")]
    SyntaxError(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Invalid credentials for user {0}")]
    LoginFailed(String),

    #[error("PASS received before USER")]
    UserRequired,

    #[error("Already logged in")]
    AlreadyLoggedIn,

    #[error("Path escapes the sandbox root: {0}")]
    SecurityViolation(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Bad sequence of commands: {0}")]
    BadSequence(&'static str),

    #[error("No passive data channel, use PASV first")]
    NoDataChannel,

    #[error("Unsupported transfer type {0:?}")]
    UnsupportedType(String),

    #[error("Can't open data connection: {0}")]
    DataConnection(#[source] io::Error),

    #[error("Data transfer failed: {0}")]
    Transfer(#[source] io::Error),

    #[error("Filesystem error: {0}")]
    Io(#[from] io::Error),

    #[error("Control connection failed: {0}")]
    Control(#[source] io::Error),
}

pub type FtpResult<T> = Result<T, FtpError>;

impl FtpError {
    pub fn is_security_violation(&self) -> bool {
        matches!(self, FtpError::SecurityViolation(_))
    }

    /// Failures on the control connection end the session instead of
    /// producing a reply.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FtpError::Control(_))
    }

    pub fn to_ftp_response(&self) -> Response {
        use response::*;
        match self {
            FtpError::UnknownCommand(verb) => {
                Response::new(NOT_IMPLEMENTED, format!("Command '{}' not implemented", verb))
            }
            FtpError::SyntaxError(_) => {
                Response::new(SYNTAX_ERROR_ARGS, "Syntax error in parameters or arguments")
            }
            FtpError::NotLoggedIn => Response::new(
                NOT_LOGGED_IN,
                "Access denied, please login with USER and PASS",
            ),
            FtpError::LoginFailed(_) => Response::new(NOT_LOGGED_IN, "Authentication failed"),
            FtpError::UserRequired => Response::new(BAD_SEQUENCE, "Login with USER first"),
            FtpError::AlreadyLoggedIn => Response::new(SUPERFLUOUS, "Already logged in"),
            // Sandbox violations look like a missing path to the client.
            FtpError::SecurityViolation(_) | FtpError::NotFound(_) => {
                Response::new(FILE_UNAVAILABLE, "No such file or directory")
            }
            FtpError::NotADirectory(_) => Response::new(FILE_UNAVAILABLE, "Not a directory"),
            FtpError::NotAFile(_) => Response::new(FILE_UNAVAILABLE, "Not a regular file"),
            FtpError::AlreadyExists(_) => {
                Response::new(FILE_UNAVAILABLE, "File or directory already exists")
            }
            FtpError::DirectoryNotEmpty(_) => {
                Response::new(FILE_UNAVAILABLE, "Directory not empty")
            }
            FtpError::PermissionDenied(_) => Response::new(FILE_UNAVAILABLE, "Permission denied"),
            FtpError::BadSequence(what) => {
                Response::new(BAD_SEQUENCE, format!("Bad sequence of commands, {}", what))
            }
            FtpError::NoDataChannel => {
                Response::new(BAD_SEQUENCE, "Bad sequence of commands, use PASV first")
            }
            FtpError::UnsupportedType(_) => Response::new(
                PARAMETER_NOT_IMPLEMENTED,
                "Command not implemented for that parameter",
            ),
            FtpError::DataConnection(_) => {
                Response::new(CANT_OPEN_DATA, "Can't open data connection")
            }
            FtpError::Transfer(_) => {
                Response::new(TRANSFER_ABORTED, "Connection closed, transfer aborted")
            }
            FtpError::Io(_) | FtpError::Control(_) => {
                Response::new(FILE_UNAVAILABLE, "Requested action not taken")
            }
        }
    }
}
