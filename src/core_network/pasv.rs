use crate::core_error::{FtpError, FtpResult};
use crate::core_ftpcommand::handlers::ControlWriter;
use crate::core_ftpcommand::response::{self, Response};
use crate::session::Session;
use crate::Config;
use log::{debug, error};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

/// One passive-mode listener and the single transfer connection accepted on it.
#[derive(Debug)]
pub struct DataChannel {
    listener: Option<TcpListener>,
    accepted: Option<TcpStream>,
    local_addr: SocketAddr,
}

impl DataChannel {
    /// Binds an OS-assigned port on `bind_ip` with a backlog of one.
    pub fn open(bind_ip: IpAddr) -> io::Result<Self> {
        let socket = match bind_ip {
            IpAddr::V4(_) => TcpSocket::new_v4()?,
            IpAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.bind(SocketAddr::new(bind_ip, 0))?;
        let listener = socket.listen(1)?;
        let local_addr = listener.local_addr()?;
        debug!("PASV listener set up on {}", local_addr);

        Ok(Self {
            listener: Some(listener),
            accepted: None,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits for the client's data connection. Any connection accepted
    /// earlier is shut down first.
    pub async fn accept_once(&mut self) -> io::Result<&mut TcpStream> {
        if let Some(mut stale) = self.accepted.take() {
            let _ = stale.shutdown().await;
        }

        let listener = self.listener.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "passive listener already closed")
        })?;
        let (stream, peer) = listener.accept().await?;
        debug!("Accepted data connection from {} on {}", peer, self.local_addr);

        Ok(self.accepted.insert(stream))
    }

    /// Shuts down the accepted stream and drops the listener.
    pub async fn close_all(&mut self) {
        if let Some(mut stream) = self.accepted.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("Data connection shutdown on {}: {}", self.local_addr, e);
            }
        }
        if self.listener.take().is_some() {
            debug!("PASV listener on {} closed", self.local_addr);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.listener.is_none() && self.accepted.is_none()
    }
}

/// `h1,h2,h3,h4,p1,p2` as carried in the 227 reply.
pub fn encode_pasv_address(ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = ip.octets();
    format!("{},{},{},{},{},{}", a, b, c, d, port / 256, port % 256)
}

/// The IPv4 address clients are told to connect to.
///
/// `pasv_address` wins when configured. Otherwise the bind address, unless it
/// is unspecified, in which case the local end of the control connection.
pub fn advertised_address(config: &Config, local_ip: IpAddr) -> FtpResult<Ipv4Addr> {
    if let Some(ip) = config.server.pasv_address {
        return Ok(ip);
    }

    let candidate = if config.server.bind_address.is_unspecified() {
        local_ip
    } else {
        config.server.bind_address
    };

    match candidate {
        IpAddr::V4(ip) => Ok(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped().ok_or_else(|| {
            FtpError::DataConnection(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("PASV needs an IPv4 address, got {}", ip),
            ))
        }),
    }
}

/// Handles the PASV FTP command.
///
/// Closes any channel left over from an earlier PASV, opens a fresh listener
/// and tells the client where to connect.
///
/// # Returns
///
/// `227 Entering Passive mode (h1,h2,h3,h4,p1,p2)` or a 425 error.
pub async fn handle_pasv_command(
    _writer: &mut ControlWriter,
    config: &Config,
    session: &mut Session,
    _args: &[String],
) -> FtpResult<Response> {
    if let Some(mut stale) = session.data_channel.take() {
        debug!("Closing stale PASV channel on {}", stale.local_addr());
        stale.close_all().await;
    }

    let advertised = advertised_address(config, session.local_ip)?;
    let channel = DataChannel::open(config.server.bind_address).map_err(|e| {
        error!("Failed to open passive listener on {}: {}", config.server.bind_address, e);
        FtpError::DataConnection(e)
    })?;

    let port = channel.local_addr().port();
    session.data_channel = Some(channel);

    Ok(Response::new(
        response::ENTERING_PASSIVE,
        format!("Entering Passive mode ({})", encode_pasv_address(advertised, port)),
    ))
}
