mod common;

use common::{TestServer, PASSWORD, USERNAME};
use std::fs;

#[tokio::test]
async fn test_greeting_and_quit() {
    let server = TestServer::start().await;
    let (mut client, greeting) = server.client().await;
    assert_eq!(greeting, "220 Welcome to boiteftpd server.\r\n");

    assert_eq!(client.cmd("QUIT").await, "221 Goodbye.\r\n");
    assert_eq!(client.read_reply().await, "");
}

#[tokio::test]
async fn test_login_gate() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;

    for line in ["PWD", "MKD blocked", "LIST", "PASV", "SITE HELP", "NOOP"] {
        let reply = client.cmd(line).await;
        assert!(reply.starts_with("530 "), "{} -> {}", line, reply);
    }
    assert!(!server.root.path().join("blocked").exists());

    assert!(client.cmd(&format!("PASS {}", PASSWORD)).await.starts_with("503 "));
    assert!(client.cmd(&format!("USER {}", USERNAME)).await.starts_with("331 "));
    assert!(client.cmd("PASS wrong").await.starts_with("530 "));
    // the failed attempt cleared the pending username
    assert!(client.cmd(&format!("PASS {}", PASSWORD)).await.starts_with("503 "));

    client.login().await;
    assert!(client.cmd(&format!("PASS {}", PASSWORD)).await.starts_with("202 "));
    assert!(client.cmd("NOOP").await.starts_with("200 "));
}

#[tokio::test]
async fn test_directory_round_trip() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;
    client.login().await;

    assert_eq!(client.cmd("MKD sub").await, "257 \"/sub\" directory created.\r\n");
    assert!(client.cmd("CWD sub").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/sub\" is the current directory.\r\n");
    assert!(client.cmd("CDUP").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is the current directory.\r\n");
    assert!(client.cmd("RMD sub").await.starts_with("250 "));
    assert!(!server.root.path().join("sub").exists());

    assert!(client.cmd("MKD a/b/c").await.starts_with("257 "));
    assert!(client.cmd("MKD a/b").await.starts_with("550 "));
    assert!(client.cmd("RMD a").await.starts_with("550 "));
    assert!(client.cmd("RMD /").await.starts_with("550 "));
    assert!(client.cmd("CDUP").await.starts_with("550 "));
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;
    client.login().await;
    fs::create_dir(server.root.path().join("inner")).unwrap();

    assert!(client.cmd("CWD inner").await.starts_with("250 "));
    for line in [
        "CWD ../../..",
        "CWD /../..",
        "SIZE ../../../etc/passwd",
        "DELE ../../../etc/passwd",
        "RNFR ../../../etc/passwd",
        "MKD ../../escaped",
    ] {
        let reply = client.cmd(line).await;
        assert_eq!(reply, "550 No such file or directory.\r\n", "{}", line);
    }
    assert_eq!(client.cmd("PWD").await, "257 \"/inner\" is the current directory.\r\n");

    let (reply, _, _) = client.download("RETR ../../../etc/passwd").await;
    assert!(reply.starts_with("550 "), "{}", reply);
}

#[tokio::test]
async fn test_rename_flow() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;
    client.login().await;
    fs::write(server.root.path().join("old.txt"), b"contents").unwrap();

    assert!(client.cmd("RNTO new.txt").await.starts_with("503 "));
    assert!(server.root.path().join("old.txt").exists());

    assert!(client.cmd("RNFR missing.txt").await.starts_with("550 "));
    assert!(client.cmd("RNFR old.txt").await.starts_with("350 "));
    assert!(client.cmd("RNTO new.txt").await.starts_with("250 "));
    assert_eq!(fs::read(server.root.path().join("new.txt")).unwrap(), b"contents");
    assert!(client.cmd("RNTO again.txt").await.starts_with("503 "));

    assert!(client.cmd("RNFR new.txt").await.starts_with("350 "));
    assert!(client.cmd("RNTO ../../outside.txt").await.starts_with("550 "));
    assert!(client.cmd("RNTO other.txt").await.starts_with("503 "));
    assert!(server.root.path().join("new.txt").exists());

    assert!(client.cmd("RNFR new.txt").await.starts_with("350 "));
    assert!(client.cmd("RNTO missingdir/other.txt").await.starts_with("550 "));
    assert!(client.cmd("RNTO other.txt").await.starts_with("503 "));
    assert!(server.root.path().join("new.txt").exists());
    assert!(!server.root.path().join("other.txt").exists());
}

#[tokio::test]
async fn test_size_dele_type_and_errors() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;
    client.login().await;
    fs::write(server.root.path().join("file.bin"), vec![7u8; 1234]).unwrap();
    fs::create_dir(server.root.path().join("dir")).unwrap();

    assert_eq!(client.cmd("SIZE file.bin").await, "213 1234.\r\n");
    assert!(client.cmd("SIZE dir").await.starts_with("550 "));

    assert!(client.cmd("TYPE a").await.starts_with("200 "));
    assert!(client.cmd("TYPE I").await.starts_with("200 "));
    assert!(client.cmd("TYPE E").await.starts_with("504 "));

    assert!(client.cmd("DELE dir").await.starts_with("550 "));
    assert!(client.cmd("DELE file.bin").await.starts_with("250 "));
    assert!(client.cmd("DELE file.bin").await.starts_with("550 "));

    assert!(client.cmd("PORT 127,0,0,1,4,1").await.starts_with("502 "));
    assert!(client.cmd("CWD").await.starts_with("501 "));
    assert!(client.cmd("SYST").await.starts_with("215 UNIX Type: L8"));
}

#[tokio::test]
async fn test_feat_and_help_blocks() {
    let server = TestServer::start().await;
    let (mut client, _) = server.client().await;
    client.login().await;

    assert_eq!(client.cmd("FEAT").await, "211-Features:\r\n PASV\r\n SIZE\r\n211 End.\r\n");

    let help = client.cmd("HELP").await;
    assert!(help.starts_with("214-"));
    assert!(help.ends_with("214 Help OK.\r\n"));
    assert!(help.contains("RETR"));

    let help = client.cmd("HELP retr").await;
    assert!(help.contains("No detailed help available for RETR"));

    // the control connection is still in sync after multi-line replies
    assert!(client.cmd("NOOP").await.starts_with("200 "));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let server = TestServer::start().await;
    let (mut first, _) = server.client().await;
    let (mut second, _) = server.client().await;
    first.login().await;

    assert!(first.cmd("MKD shared").await.starts_with("257 "));
    assert!(first.cmd("CWD shared").await.starts_with("250 "));
    assert!(second.cmd("PWD").await.starts_with("530 "));

    second.login().await;
    assert_eq!(second.cmd("PWD").await, "257 \"/\" is the current directory.\r\n");
}
