//! FTP reply rendering.
//!
//! Single-line replies are `<code> <text>.\r\n`. Multi-line blocks open with
//! `<code>-<header>`, carry space-prefixed body lines and close with the same
//! code followed by a space.

use std::fmt;

pub const OPENING_DATA: u16 = 150;
pub const OK: u16 = 200;
pub const SUPERFLUOUS: u16 = 202;
pub const SYSTEM_STATUS: u16 = 211;
pub const FILE_STATUS: u16 = 213;
pub const HELP_MESSAGE: u16 = 214;
pub const SYSTEM_TYPE: u16 = 215;
pub const SERVICE_READY: u16 = 220;
pub const CLOSING_CONTROL: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ENTERING_PASSIVE: u16 = 227;
pub const LOGGED_IN: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const NEED_PASSWORD: u16 = 331;
pub const PENDING_FURTHER_INFO: u16 = 350;
pub const CANT_OPEN_DATA: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;
pub const SYNTAX_ERROR_ARGS: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const BAD_SEQUENCE: u16 = 503;
pub const PARAMETER_NOT_IMPLEMENTED: u16 = 504;
pub const NOT_LOGGED_IN: u16 = 530;
pub const FILE_UNAVAILABLE: u16 = 550;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Single {
        code: u16,
        text: String,
    },
    Multi {
        code: u16,
        header: String,
        lines: Vec<String>,
        footer: String,
    },
}

impl Response {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Response::Single {
            code,
            text: text.into(),
        }
    }

    pub fn multi(
        code: u16,
        header: impl Into<String>,
        lines: Vec<String>,
        footer: impl Into<String>,
    ) -> Self {
        Response::Multi {
            code,
            header: header.into(),
            lines,
            footer: footer.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Response::Single { code, .. } | Response::Multi { code, .. } => *code,
        }
    }

    /// Renders the reply exactly as it goes on the wire.
    pub fn render(&self) -> String {
        match self {
            Response::Single { code, text } => format!("{} {}.\r\n", code, text),
            Response::Multi {
                code,
                header,
                lines,
                footer,
            } => {
                let mut out = format!("{}-{}\r\n", code, header);
                for line in lines {
                    out.push(' ');
                    out.push_str(line);
                    out.push_str("\r\n");
                }
                out.push_str(&format!("{} {}.\r\n", code, footer));
                out
            }
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render().trim_end())
    }
}
