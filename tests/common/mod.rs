#![allow(dead_code)]

use boiteftpd::config::Config;
use boiteftpd::core_network::network;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const USERNAME: &str = "ftp";
pub const PASSWORD: &str = "secret";

/// A server on an ephemeral loopback port, serving a fresh temporary root.
pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let root = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.server.bind_address = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.username = USERNAME.to_string();
        config.server.password = PASSWORD.to_string();
        config.server.root_dir = root.path().to_path_buf();
        config.validate().unwrap();

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(network::serve(listener, Arc::new(config)));

        Self { addr, root, handle }
    }

    pub async fn client(&self) -> (FtpClient, String) {
        FtpClient::connect(self.addr).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Minimal FTP client speaking just enough of the protocol for the tests.
pub struct FtpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl FtpClient {
    pub async fn connect(addr: SocketAddr) -> (Self, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(reader),
            writer,
        };
        let greeting = client.read_reply().await;
        (client, greeting)
    }

    /// Reads one complete reply, following multi-line blocks to their end.
    /// Returns an empty string once the server has closed the connection.
    pub async fn read_reply(&mut self) -> String {
        let mut reply = String::new();
        let mut first = String::new();
        if self.reader.read_line(&mut first).await.unwrap() == 0 {
            return reply;
        }
        reply.push_str(&first);

        if first.len() >= 4 && first.as_bytes()[3] == b'-' {
            let closing = format!("{} ", &first[..3]);
            loop {
                let mut line = String::new();
                if self.reader.read_line(&mut line).await.unwrap() == 0 {
                    break;
                }
                reply.push_str(&line);
                if line.starts_with(&closing) {
                    break;
                }
            }
        }
        reply
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    pub async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_reply().await
    }

    pub async fn login(&mut self) {
        assert!(self.cmd(&format!("USER {}", USERNAME)).await.starts_with("331 "));
        let reply = self.cmd(&format!("PASS {}", PASSWORD)).await;
        assert!(reply.starts_with("230 "), "{}", reply);
    }

    /// Sends PASV and returns the advertised data address.
    pub async fn pasv(&mut self) -> SocketAddr {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 Entering Passive mode ("), "{}", reply);
        parse_pasv(&reply)
    }

    /// Runs a download-style command (LIST, NLST, RETR) and returns the
    /// preliminary reply, the data received and the final reply.
    pub async fn download(&mut self, line: &str) -> (String, Vec<u8>, String) {
        let data_addr = self.pasv().await;
        let mut data = TcpStream::connect(data_addr).await.unwrap();

        let preliminary = self.cmd(line).await;
        if !preliminary.starts_with("150 ") {
            return (preliminary, Vec::new(), String::new());
        }

        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        let last = self.read_reply().await;
        (preliminary, received, last)
    }

    /// Uploads `payload` with STOR and returns the preliminary and final
    /// replies.
    pub async fn upload(&mut self, path: &str, payload: &[u8]) -> (String, String) {
        let data_addr = self.pasv().await;
        let mut data = TcpStream::connect(data_addr).await.unwrap();

        let preliminary = self.cmd(&format!("STOR {}", path)).await;
        if !preliminary.starts_with("150 ") {
            return (preliminary, String::new());
        }

        data.write_all(payload).await.unwrap();
        data.shutdown().await.unwrap();
        drop(data);
        let last = self.read_reply().await;
        (preliminary, last)
    }
}

pub fn parse_pasv(reply: &str) -> SocketAddr {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.find(')').unwrap();
    let parts: Vec<u16> = reply[start..end]
        .split(',')
        .map(|p| p.trim().parse().unwrap())
        .collect();
    assert_eq!(parts.len(), 6);
    let ip = Ipv4Addr::new(parts[0] as u8, parts[1] as u8, parts[2] as u8, parts[3] as u8);
    SocketAddr::new(IpAddr::V4(ip), parts[4] * 256 + parts[5])
}
