#![allow(clippy::unwrap_used)]
// Integration tests for `CtrlSocket` against a scripted datagram peer.

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::UnixDatagram;

use fstctl_api::{CtrlSocket, Error, MAX_COMMAND_LEN};

// ── Helpers ─────────────────────────────────────────────────────────

struct Peer {
    _dir: TempDir,
    socket: UnixDatagram,
    ctrl_path: PathBuf,
    client_dir: PathBuf,
}

fn setup() -> Peer {
    let dir = tempfile::tempdir().unwrap();
    let ctrl_path = dir.path().join("wlan0");
    let socket = UnixDatagram::bind(&ctrl_path).unwrap();
    let client_dir = dir.path().to_path_buf();
    Peer {
        _dir: dir,
        socket,
        ctrl_path,
        client_dir,
    }
}

/// Receive one command and answer it with each of `replies` in order.
async fn answer(peer: &Peer, replies: &[&str]) -> String {
    let mut buf = [0u8; 4096];
    let (len, from) = peer.socket.recv_from(&mut buf).await.unwrap();
    let from = from.as_pathname().unwrap().to_path_buf();
    for reply in replies {
        peer.socket.send_to(reply.as_bytes(), &from).await.unwrap();
    }
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

// ── Request / response ──────────────────────────────────────────────

#[tokio::test]
async fn test_request_round_trip() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(2)).unwrap();

    let (reply, seen) = tokio::join!(client.request("PING"), answer(&peer, &["PONG\n"]));

    assert_eq!(seen, "PING");
    assert_eq!(reply.unwrap(), "PONG\n");
}

#[tokio::test]
async fn test_request_skips_unsolicited_lines() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(2)).unwrap();

    let (reply, _) = tokio::join!(
        client.request("FST-MANAGER LIST_GROUPS"),
        answer(&peer, &["<3>FST-EVENT-PEER connected ifname=wlan0", "grp1\n"])
    );

    assert_eq!(reply.unwrap(), "grp1\n");
}

#[tokio::test]
async fn test_request_timeout() {
    let peer = setup();
    let client =
        CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_millis(100)).unwrap();

    let result = client.request("PING").await;

    assert!(
        matches!(result, Err(Error::Timeout { timeout_ms: 100 })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_late_reply_is_not_taken_by_next_request() {
    let peer = setup();
    let client =
        CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_millis(100)).unwrap();

    // The first reply arrives only after the request has timed out.
    let (first, _) = tokio::join!(client.request("FST-MANAGER SESSION_INITIATE 1"), async {
        let mut buf = [0u8; 4096];
        let (_, from) = peer.socket.recv_from(&mut buf).await.unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        peer.socket
            .send_to(b"FAIL\n", from.as_pathname().unwrap())
            .await
            .unwrap();
    });
    assert!(matches!(first, Err(Error::Timeout { .. })), "got: {first:?}");

    let (second, seen) = tokio::join!(
        client.request("FST-MANAGER SESSION_TRANSFER 1"),
        answer(&peer, &["OK\n"])
    );
    assert_eq!(seen, "FST-MANAGER SESSION_TRANSFER 1");
    assert_eq!(second.unwrap(), "OK\n");
}

#[tokio::test]
async fn test_request_rejects_long_command() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(1)).unwrap();

    let command = "X".repeat(MAX_COMMAND_LEN + 1);
    let result = client.request(&command).await;

    assert!(
        matches!(result, Err(Error::CommandTooLong { len, limit }) if len == MAX_COMMAND_LEN + 1 && limit == MAX_COMMAND_LEN),
        "expected CommandTooLong, got: {result:?}"
    );
}

// ── Attach / events ─────────────────────────────────────────────────

#[tokio::test]
async fn test_attach_then_receive_event() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(2)).unwrap();

    let (attached, seen) = tokio::join!(client.attach(), answer(&peer, &["OK\n"]));
    attached.unwrap();
    assert_eq!(seen, "ATTACH");

    peer.socket
        .send_to(b"<3>CTRL-EVENT-TERMINATING", client.local_path())
        .await
        .unwrap();
    let event = client.recv().await.unwrap();
    assert_eq!(event, "<3>CTRL-EVENT-TERMINATING");
}

#[tokio::test]
async fn test_attach_rejected() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(2)).unwrap();

    let (attached, _) = tokio::join!(client.attach(), answer(&peer, &["FAIL\n"]));

    assert!(
        matches!(attached, Err(Error::Handshake { command: "ATTACH", .. })),
        "expected Handshake error, got: {attached:?}"
    );
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_drop_removes_client_socket() {
    let peer = setup();
    let client = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(1)).unwrap();
    let local = client.local_path().to_path_buf();
    assert!(local.exists());
    assert!(
        local
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("fstctl_")
    );

    drop(client);
    assert!(!local.exists());
}

#[tokio::test]
async fn test_two_handles_get_distinct_paths() {
    let peer = setup();
    let a = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(1)).unwrap();
    let b = CtrlSocket::open(&peer.ctrl_path, &peer.client_dir, Duration::from_secs(1)).unwrap();
    assert_ne!(a.local_path(), b.local_path());
}
