use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_LISTEN_PORT, DEFAULT_USERNAME};
use crate::core_cli::Cli;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub listen_port: u16,
    pub username: String,
    pub password: String,
    pub root_dir: PathBuf,
    pub pasv_address: Option<Ipv4Addr>, // advertised in 227 replies when set
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS
                .parse()
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            listen_port: DEFAULT_LISTEN_PORT,
            username: default_username(),
            password: String::new(), // no default, must come from the file or -P
            root_dir: PathBuf::from("."),
            pasv_address: None,
        }
    }
}

/// The login name of the user running the server, or `ftp` when the
/// environment does not say.
pub fn default_username() -> String {
    username_from(|key| std::env::var(key).ok())
}

fn username_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| lookup(key))
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_USERNAME))
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Command-line flags take precedence over file values.
    pub fn apply_cli(&mut self, args: &Cli) {
        if let Some(bind) = args.bind {
            self.server.bind_address = bind;
        }
        if let Some(port) = args.port {
            self.server.listen_port = port;
        }
        if let Some(user) = &args.user {
            self.server.username = user.clone();
        }
        if let Some(password) = &args.password {
            self.server.password = password.clone();
        }
        if let Some(directory) = &args.directory {
            self.server.root_dir = directory.clone();
        }
    }

    /// Checks credentials and canonicalizes `root_dir` in place.
    pub fn validate(&mut self) -> Result<()> {
        if self.server.username.trim().is_empty() {
            bail!("A username is required");
        }
        if self.server.password.is_empty() {
            bail!("A password is required, set it in the [server] table or pass --password");
        }

        let root = self
            .server
            .root_dir
            .canonicalize()
            .with_context(|| {
                format!("Root directory {:?} is not accessible", self.server.root_dir)
            })?;
        if !root.is_dir() {
            bail!("Root directory {:?} is not a directory", root);
        }
        self.server.root_dir = root;

        Ok(())
    }
}
