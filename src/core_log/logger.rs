use chrono::Local;
use colored::Colorize;
use env_logger::{Builder, Env};
use log::{Level, Record};
use std::fmt::Display;
use std::io::Write;

pub const SUCCESS_TARGET: &str = "boiteftpd::success";
pub const SECURITY_TARGET: &str = "boiteftpd::security";

/// Installs the global logger. `RUST_LOG` still wins over `debug`.
pub fn init(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let line = format!("[{}] [{:<8}] {}", timestamp, label(record), record.args());
            writeln!(buf, "{}", paint(record, &line))
        })
        .init();
}

/// Reports a milestone such as the server coming up.
pub fn success(message: impl Display) {
    log::info!(target: SUCCESS_TARGET, "{}", message);
}

/// Reports a security event, e.g. a path resolving outside the sandbox.
pub fn critical(message: impl Display) {
    log::error!(target: SECURITY_TARGET, "{}", message);
}

fn label(record: &Record) -> &'static str {
    match (record.target(), record.level()) {
        (SUCCESS_TARGET, _) => "SUCCESS",
        (SECURITY_TARGET, _) => "CRITICAL",
        (_, Level::Error) => "ERROR",
        (_, Level::Warn) => "WARNING",
        (_, Level::Info) => "INFO",
        (_, Level::Debug) => "DEBUG",
        (_, Level::Trace) => "TRACE",
    }
}

fn paint(record: &Record, line: &str) -> String {
    let painted = match (record.target(), record.level()) {
        (SUCCESS_TARGET, _) => line.green(),
        (SECURITY_TARGET, _) => line.red().bold(),
        (_, Level::Error) => line.red(),
        (_, Level::Warn) => line.yellow(),
        (_, Level::Info) => line.bold(),
        (_, Level::Debug) | (_, Level::Trace) => line.dimmed(),
    };
    painted.to_string()
}
