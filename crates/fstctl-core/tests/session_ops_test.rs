#![allow(clippy::unwrap_used)]
// Session and topology operations against a scripted daemon.

mod common;

use pretty_assertions::assert_eq;

use common::{MockDaemon, table};
use fstctl_core::{
    CoreError, FstCtrl, GroupInfo, IfaceInfo, MacAddress, RespondStatus, SessionInfo,
    SessionState,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(entries: &[(&str, &str)]) -> (MockDaemon, FstCtrl) {
    let daemon = MockDaemon::start(table(entries));
    let ctrl = FstCtrl::connect(daemon.config()).await.unwrap();
    (daemon, ctrl)
}

fn mac(text: &str) -> MacAddress {
    text.parse().unwrap()
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_attaches_event_channel() {
    let (daemon, ctrl) = setup(&[]).await;
    assert_eq!(daemon.attached_count(), 1);

    ctrl.disconnect().await;
    assert_eq!(daemon.attached_count(), 0);
}

#[tokio::test]
async fn test_second_connect_same_socket_rejected() {
    let (daemon, ctrl) = setup(&[]).await;

    let second = FstCtrl::connect(daemon.config()).await;
    assert!(
        matches!(second, Err(CoreError::AlreadyConnected { .. })),
        "expected AlreadyConnected, got: {second:?}"
    );

    ctrl.disconnect().await;
    let again = FstCtrl::connect(daemon.config()).await.unwrap();
    again.disconnect().await;
}

#[tokio::test]
async fn test_operations_after_disconnect_fail() {
    let (_daemon, ctrl) = setup(&[]).await;
    ctrl.disconnect().await;

    let result = ctrl.list_groups().await;
    assert!(matches!(result, Err(CoreError::Disconnected)), "got: {result:?}");
}

// ── Sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_add_returns_id() {
    let (daemon, ctrl) = setup(&[("FST-MANAGER SESSION_ADD g1", "5\n")]).await;

    assert_eq!(ctrl.session_add("g1").await.unwrap(), 5);
    assert_eq!(daemon.commands(), vec!["FST-MANAGER SESSION_ADD g1"]);
}

#[tokio::test]
async fn test_session_add_fail_is_error() {
    let (_daemon, ctrl) = setup(&[("FST-MANAGER SESSION_ADD g1", "FAIL\n")]).await;

    let result = ctrl.session_add("g1").await;
    assert!(
        matches!(result, Err(CoreError::Rejected { .. })),
        "expected Rejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_session_add_sentinel_is_error() {
    let (_daemon, ctrl) = setup(&[("FST-MANAGER SESSION_ADD g1", "4294967295\n")]).await;

    let result = ctrl.session_add("g1").await;
    assert!(
        matches!(result, Err(CoreError::Protocol { .. })),
        "expected Protocol, got: {result:?}"
    );
}

#[tokio::test]
async fn test_session_info_decodes_fields() {
    let (_daemon, ctrl) = setup(&[(
        "FST-MANAGER SESSION_GET 3",
        "old_peer_addr=aa:bb:cc:dd:ee:ff\nnew_peer_addr=NONE\nold_ifname=wlan0\n\
         new_ifname=wlan1\nllt=100\nstate=SETUP_COMPLETION\n",
    )])
    .await;

    let info = ctrl.session_info(3).await.unwrap();
    assert_eq!(
        info,
        SessionInfo {
            session_id: 3,
            old_peer_addr: Some(mac("aa:bb:cc:dd:ee:ff")),
            new_peer_addr: None,
            old_ifname: Some("wlan0".into()),
            new_ifname: Some("wlan1".into()),
            llt: 100,
            state: Some(SessionState::SetupCompletion),
        }
    );
}

#[tokio::test]
async fn test_session_commands_wire_format() {
    let (daemon, ctrl) = setup(&[
        ("FST-MANAGER SESSION_SET 2 new_ifname=wlan1", "OK\n"),
        ("FST-MANAGER SESSION_INITIATE 2", "OK\n"),
        ("FST-MANAGER SESSION_RESPOND 2 accept", "OK\n"),
        ("FST-MANAGER SESSION_TRANSFER 2", "OK\n"),
        ("FST-MANAGER SESSION_TEARDOWN 2", "OK\n"),
        ("FST-MANAGER SESSION_REMOVE 2", "OK\n"),
    ])
    .await;

    ctrl.session_set(2, "new_ifname", "wlan1").await.unwrap();
    ctrl.session_initiate(2).await.unwrap();
    ctrl.session_respond(2, RespondStatus::Accept).await.unwrap();
    ctrl.session_transfer(2).await.unwrap();
    ctrl.session_teardown(2).await.unwrap();
    ctrl.session_remove(2).await.unwrap();

    assert_eq!(daemon.commands().len(), 6);
}

#[tokio::test]
async fn test_session_command_non_ok_is_rejected() {
    let (_daemon, ctrl) = setup(&[("FST-MANAGER SESSION_INITIATE 9", "FAIL\n")]).await;

    let result = ctrl.session_initiate(9).await;
    assert!(matches!(result, Err(CoreError::Rejected { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_list_sessions() {
    let (_daemon, ctrl) = setup(&[
        ("FST-MANAGER LIST_SESSIONS g1", "1 2 7\n"),
        ("FST-MANAGER LIST_SESSIONS g2", ""),
    ])
    .await;

    assert_eq!(ctrl.list_sessions("g1").await.unwrap(), vec![1, 2, 7]);
    assert!(ctrl.list_sessions("g2").await.unwrap().is_empty());
}

// ── Topology ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_groups_and_ifaces() {
    let (_daemon, ctrl) = setup(&[
        ("FST-MANAGER LIST_GROUPS", "g1\ng2\n"),
        (
            "FST-MANAGER LIST_IFACES g1",
            "wlan0|aa:bb:cc:dd:ee:01|1|100\nwlan1|aa:bb:cc:dd:ee:02|2|200\n",
        ),
    ])
    .await;

    assert_eq!(
        ctrl.list_groups().await.unwrap(),
        vec![GroupInfo { id: "g1".into() }, GroupInfo { id: "g2".into() }]
    );
    assert_eq!(
        ctrl.list_group_ifaces("g1").await.unwrap(),
        vec![
            IfaceInfo {
                name: "wlan0".into(),
                addr: mac("aa:bb:cc:dd:ee:01"),
                priority: 1,
                llt: 100,
            },
            IfaceInfo {
                name: "wlan1".into(),
                addr: mac("aa:bb:cc:dd:ee:02"),
                priority: 2,
                llt: 200,
            },
        ]
    );
}

#[tokio::test]
async fn test_list_iface_peers() {
    let (_daemon, ctrl) = setup(&[(
        "FST-MANAGER IFACE_PEERS g1 wlan0",
        "00:11:22:33:44:55 66:77:88:99:aa:bb\n",
    )])
    .await;

    assert_eq!(
        ctrl.list_iface_peers("g1", "wlan0").await.unwrap(),
        vec![mac("00:11:22:33:44:55"), mac("66:77:88:99:aa:bb")]
    );
}

#[tokio::test]
async fn test_peer_mbies() {
    let (_daemon, ctrl) = setup(&[
        ("FST-MANAGER GET_PEER_MBIES wlan0 00:11:22:33:44:55", "9e0a0102\n"),
        ("FST-MANAGER GET_PEER_MBIES wlan0 66:77:88:99:aa:bb", "FAIL\n"),
    ])
    .await;

    let mbies = ctrl
        .peer_mbies("wlan0", mac("00:11:22:33:44:55"))
        .await
        .unwrap();
    assert_eq!(mbies.as_str(), "9e0a0102");

    let missing = ctrl.peer_mbies("wlan0", mac("66:77:88:99:aa:bb")).await;
    assert!(
        matches!(missing, Err(CoreError::InvalidArgument { .. })),
        "expected InvalidArgument, got: {missing:?}"
    );
}

#[tokio::test]
async fn test_attach_and_detach_iface() {
    let (daemon, ctrl) = setup(&[
        ("FST-ATTACH wlan0 g1 llt=100 priority=3", "OK\n"),
        ("FST-DETACH wlan0", "OK\n"),
    ])
    .await;

    let iface = IfaceInfo {
        name: "wlan0".into(),
        addr: mac("aa:bb:cc:dd:ee:ff"),
        priority: 3,
        llt: 100,
    };
    ctrl.attach_iface("g1", &iface).await.unwrap();
    ctrl.detach_iface("wlan0").await.unwrap();

    assert_eq!(
        daemon.commands(),
        vec!["FST-ATTACH wlan0 g1 llt=100 priority=3", "FST-DETACH wlan0"]
    );
}

// ── Daemon mode ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_iface_on_supplicant() {
    let (daemon, ctrl) = setup(&[
        ("INTERFACE_LIST", "wlan0\n"),
        ("INTERFACE_ADD wlan1", "OK\n"),
        ("INTERFACE_REMOVE wlan1", "OK\n"),
    ])
    .await;

    ctrl.add_iface("wlan1").await.unwrap();
    ctrl.del_iface("wlan1").await.unwrap();

    assert_eq!(
        daemon.commands(),
        vec![
            "INTERFACE_LIST",
            "INTERFACE_ADD wlan1",
            "INTERFACE_LIST",
            "INTERFACE_REMOVE wlan1",
        ]
    );
}

#[tokio::test]
async fn test_add_iface_on_hostapd_is_unsupported() {
    // No INTERFACE_LIST entry: the table answers UNKNOWN COMMAND.
    let (daemon, ctrl) = setup(&[]).await;

    let result = ctrl.add_iface("wlan1").await;
    assert!(
        matches!(result, Err(CoreError::Unsupported { .. })),
        "expected Unsupported, got: {result:?}"
    );
    assert_eq!(daemon.commands(), vec!["INTERFACE_LIST"]);
}

#[tokio::test]
async fn test_daemon_mode_probe() {
    let (_daemon, ctrl) = setup(&[("INTERFACE_LIST", "FAIL\n")]).await;
    assert_eq!(
        ctrl.daemon_mode().await.unwrap(),
        fstctl_core::DaemonMode::AccessPoint
    );
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_unanswered_command_times_out() {
    let daemon = MockDaemon::start(|_: &str| None);
    let ctrl = FstCtrl::connect(daemon.config()).await.unwrap();

    let result = ctrl.list_groups().await;
    assert!(
        matches!(result, Err(CoreError::Timeout { timeout_ms: 500 })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_overlong_command_rejected_locally() {
    let (daemon, ctrl) = setup(&[]).await;

    let group = "g".repeat(300);
    let result = ctrl.list_sessions(&group).await;
    assert!(
        matches!(result, Err(CoreError::CommandTooLong { .. })),
        "expected CommandTooLong, got: {result:?}"
    );
    assert!(daemon.commands().is_empty());
}
