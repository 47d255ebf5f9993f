/// Number of arguments a verb accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Optional, // zero or one
    Any,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == *n,
            Arity::Optional => count <= 1,
            Arity::Any => true,
        }
    }
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    NOOP,
    PWD,
    CWD,
    CDUP,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    SIZE,
    TYPE,
    PASV,
    LIST,
    NLST,
    RETR,
    STOR,
    FEAT,
    HELP,
    SYST,
}

impl FtpCommand {
    pub const ALL: [FtpCommand; 22] = [
        FtpCommand::USER,
        FtpCommand::PASS,
        FtpCommand::QUIT,
        FtpCommand::NOOP,
        FtpCommand::PWD,
        FtpCommand::CWD,
        FtpCommand::CDUP,
        FtpCommand::MKD,
        FtpCommand::RMD,
        FtpCommand::DELE,
        FtpCommand::RNFR,
        FtpCommand::RNTO,
        FtpCommand::SIZE,
        FtpCommand::TYPE,
        FtpCommand::PASV,
        FtpCommand::LIST,
        FtpCommand::NLST,
        FtpCommand::RETR,
        FtpCommand::STOR,
        FtpCommand::FEAT,
        FtpCommand::HELP,
        FtpCommand::SYST,
    ];

    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "NOOP" => Some(FtpCommand::NOOP),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "SIZE" => Some(FtpCommand::SIZE),
            "TYPE" => Some(FtpCommand::TYPE),
            "PASV" => Some(FtpCommand::PASV),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "FEAT" => Some(FtpCommand::FEAT),
            "HELP" => Some(FtpCommand::HELP),
            "SYST" => Some(FtpCommand::SYST),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::NOOP => "NOOP",
            FtpCommand::PWD => "PWD",
            FtpCommand::CWD => "CWD",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::MKD => "MKD",
            FtpCommand::RMD => "RMD",
            FtpCommand::DELE => "DELE",
            FtpCommand::RNFR => "RNFR",
            FtpCommand::RNTO => "RNTO",
            FtpCommand::SIZE => "SIZE",
            FtpCommand::TYPE => "TYPE",
            FtpCommand::PASV => "PASV",
            FtpCommand::LIST => "LIST",
            FtpCommand::NLST => "NLST",
            FtpCommand::RETR => "RETR",
            FtpCommand::STOR => "STOR",
            FtpCommand::FEAT => "FEAT",
            FtpCommand::HELP => "HELP",
            FtpCommand::SYST => "SYST",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            FtpCommand::QUIT
            | FtpCommand::NOOP
            | FtpCommand::PWD
            | FtpCommand::CDUP
            | FtpCommand::PASV
            | FtpCommand::FEAT
            | FtpCommand::SYST => Arity::Exact(0),
            FtpCommand::LIST | FtpCommand::NLST => Arity::Optional,
            FtpCommand::HELP => Arity::Any,
            _ => Arity::Exact(1),
        }
    }

    /// Verbs that may run before login.
    pub fn allowed_before_login(&self) -> bool {
        matches!(self, FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT)
    }
}
