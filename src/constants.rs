// src/constants.rs

/// Unit of file streaming over the data connection.
pub const CHUNK_SIZE: usize = 8 * 1024;

pub const DEFAULT_LISTEN_PORT: u16 = 2528;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_USERNAME: &str = "ftp";

/// Pause after a failed accept, doubled per consecutive failure up to the cap.
pub const ACCEPT_BACKOFF_INITIAL_MS: u64 = 10;
pub const ACCEPT_BACKOFF_MAX_MS: u64 = 1000;

pub const SYSTEM_TYPE: &str = "UNIX Type: L8";
pub const GREETING: &str = "Welcome to boiteftpd server";
