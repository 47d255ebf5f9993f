use crate::core_network::pasv::DataChannel;
use crate::core_sandbox::{PathSandbox, TransferType};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Where a session stands in the USER/PASS exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    AwaitingPassword,
    Authenticated,
}

/// Per-connection state, owned by the task serving that control connection.
#[derive(Debug)]
pub struct Session {
    pub authenticated: bool,
    pub pending_username: Option<String>, // set by USER, consumed by PASS
    pub transfer_type: TransferType,
    pub rename_from: Option<PathBuf>, // set by RNFR, consumed by RNTO
    pub data_channel: Option<DataChannel>,
    pub sandbox: PathSandbox,
    pub local_ip: IpAddr,
    pub peer_addr: SocketAddr,
}

impl Session {
    pub fn new(sandbox: PathSandbox, local_ip: IpAddr, peer_addr: SocketAddr) -> Self {
        Self {
            authenticated: false,
            pending_username: None,
            transfer_type: TransferType::default(),
            rename_from: None,
            data_channel: None,
            sandbox,
            local_ip,
            peer_addr,
        }
    }

    pub fn login_state(&self) -> LoginState {
        if self.authenticated {
            LoginState::Authenticated
        } else if self.pending_username.is_some() {
            LoginState::AwaitingPassword
        } else {
            LoginState::Unauthenticated
        }
    }

    /// Releases whatever the session still holds. Safe to call more than once.
    pub async fn teardown(&mut self) {
        self.rename_from = None;
        if let Some(mut channel) = self.data_channel.take() {
            channel.close_all().await;
        }
    }
}
