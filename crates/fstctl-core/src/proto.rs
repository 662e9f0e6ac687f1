// ── Control-interface vocabulary ──
//
// Literal command keywords, notification prefixes and key names shared
// with the daemon's FST manager interface.

/// Prefix of every FST manager command.
pub const MANAGER_PREFIX: &str = "FST-MANAGER ";

pub const LIST_GROUPS: &str = "LIST_GROUPS";
pub const LIST_IFACES: &str = "LIST_IFACES";
pub const IFACE_PEERS: &str = "IFACE_PEERS";
pub const GET_PEER_MBIES: &str = "GET_PEER_MBIES";
pub const LIST_SESSIONS: &str = "LIST_SESSIONS";
pub const SESSION_ADD: &str = "SESSION_ADD";
pub const SESSION_REMOVE: &str = "SESSION_REMOVE";
pub const SESSION_GET: &str = "SESSION_GET";
pub const SESSION_SET: &str = "SESSION_SET";
pub const SESSION_INITIATE: &str = "SESSION_INITIATE";
pub const SESSION_RESPOND: &str = "SESSION_RESPOND";
pub const SESSION_TRANSFER: &str = "SESSION_TRANSFER";
pub const SESSION_TEARDOWN: &str = "SESSION_TEARDOWN";

// Daemon-level commands, sent without the manager prefix.
pub const FST_ATTACH: &str = "FST-ATTACH";
pub const FST_DETACH: &str = "FST-DETACH";
pub const INTERFACE_ADD: &str = "INTERFACE_ADD";
pub const INTERFACE_REMOVE: &str = "INTERFACE_REMOVE";
pub const INTERFACE_LIST: &str = "INTERFACE_LIST";
pub const PING: &str = "PING";
pub const PONG: &str = "PONG";

// Per-interface network profile commands (wpa_supplicant).
pub const ADD_NETWORK: &str = "ADD_NETWORK";
pub const SET_NETWORK: &str = "SET_NETWORK";
pub const SELECT_NETWORK: &str = "SELECT_NETWORK";
pub const REMOVE_NETWORK_ALL: &str = "REMOVE_NETWORK ALL";

// ── Replies ─────────────────────────────────────────────────────────

pub const REPLY_OK: &str = "OK";
pub const REPLY_FAIL: &str = "FAIL";

/// Reply prefixes with which hostapd refuses `INTERFACE_LIST`.
pub const UNKNOWN_COMMAND_REPLIES: [&str; 3] = ["FAIL", "BAD", "UNKNOWN COMMAND"];

/// Placeholder value meaning "not set".
pub const VALUE_NONE: &str = "NONE";

// ── Session info keys (`SESSION_GET`) ───────────────────────────────

pub const KEY_OLD_PEER_ADDR: &str = "old_peer_addr";
pub const KEY_NEW_PEER_ADDR: &str = "new_peer_addr";
pub const KEY_OLD_IFNAME: &str = "old_ifname";
pub const KEY_NEW_IFNAME: &str = "new_ifname";
pub const KEY_LLT: &str = "llt";
pub const KEY_STATE: &str = "state";

// ── Notifications ───────────────────────────────────────────────────

pub const EVENT_TERMINATING: &str = "CTRL-EVENT-TERMINATING";

/// Accepted spellings of the peer notification prefix.
pub const PEER_EVENT_PREFIXES: [&str; 2] = ["FST-EVENT-PEER ", "PEER-EVENT "];

/// Accepted spellings of the session notification prefix.
pub const SESSION_EVENT_PREFIXES: [&str; 2] = ["FST-EVENT-SESSION ", "SESSION-EVENT "];

pub const PEER_CONNECTED: &str = "connected";
pub const PEER_DISCONNECTED: &str = "disconnected";
pub const KEY_IFNAME: &str = "ifname";
/// Accepted spellings of the peer address key.
pub const KEY_PEER_ADDR: [&str; 2] = ["peer_addr", "addr"];

pub const KEY_SESSION_ID: &str = "session_id";
/// Accepted spellings of the session event type key.
pub const KEY_EVENT_TYPE: [&str; 2] = ["event_type", "evt_type"];
pub const KEY_OLD_STATE: &str = "old_state";
pub const KEY_NEW_STATE: &str = "new_state";
pub const KEY_REASON: &str = "reason";
pub const KEY_REJECT_CODE: &str = "reject_code";
pub const KEY_INITIATOR: &str = "initiator";

/// Wrap `body` in the per-interface command form used by wpa_supplicant.
pub fn for_iface(iface: &str, body: &str) -> String {
    format!("IFNAME={iface} {body}")
}
