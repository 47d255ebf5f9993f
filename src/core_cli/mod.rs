use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "boiteftpd", version, about = "A small sandboxed FTP server written in Rust.")]
pub struct Cli {
    /// Path to a TOML configuration file with a [server] table
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<IpAddr>,

    /// Control connection port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Username accepted by USER/PASS
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password accepted by USER/PASS
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Directory served as the FTP root
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    pub debug: bool,
}
