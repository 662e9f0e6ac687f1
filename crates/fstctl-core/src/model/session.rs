// ── Session domain types ──
//
// A session moves traffic with one peer from an old interface to a new
// one. The daemon owns the state machine; these types only mirror what
// it reports.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::mac::MacAddress;

/// Session id the daemon never assigns. Peer notifications carry it.
pub const INVALID_SESSION_ID: u32 = u32::MAX;

/// Position of a session in the daemon's state machine.
///
/// Ordered: a session only moves forward until it falls back to `Initial`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SessionState {
    Initial,
    SetupCompletion,
    TransitionDone,
    TransitionConfirmed,
}

/// Why a session dropped back to [`SessionState::Initial`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Reason {
    #[serde(rename = "REASON_TEARDOWN")]
    #[strum(serialize = "REASON_TEARDOWN")]
    Teardown,
    #[serde(rename = "REASON_SETUP")]
    #[strum(serialize = "REASON_SETUP")]
    Setup,
    #[serde(rename = "REASON_SWITCH")]
    #[strum(serialize = "REASON_SWITCH")]
    Switch,
    #[serde(rename = "REASON_STT")]
    #[strum(serialize = "REASON_STT")]
    Stt,
    #[serde(rename = "REASON_REJECT")]
    #[strum(serialize = "REASON_REJECT")]
    Reject,
    #[serde(rename = "REASON_ERROR_PARAMS")]
    #[strum(serialize = "REASON_ERROR_PARAMS")]
    ErrorParams,
    #[serde(rename = "REASON_RESET")]
    #[strum(serialize = "REASON_RESET")]
    Reset,
    #[serde(rename = "REASON_DETACH_IFACE")]
    #[strum(serialize = "REASON_DETACH_IFACE")]
    DetachIface,
}

/// Which side started a transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Initiator {
    Local,
    Remote,
}

impl Initiator {
    /// `LOCAL` is local; anything else the daemon sends is remote.
    pub fn from_wire(value: &str) -> Self {
        if value == "LOCAL" {
            Self::Local
        } else {
            Self::Remote
        }
    }
}

/// Answer to a peer's session setup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RespondStatus {
    Accept,
    Reject,
}

/// Snapshot of one session as reported by `SESSION_GET`.
///
/// Fields the daemon reports as `NONE` (or reports malformed) stay at
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: u32,
    pub old_peer_addr: Option<MacAddress>,
    pub new_peer_addr: Option<MacAddress>,
    pub old_ifname: Option<String>,
    pub new_ifname: Option<String>,
    pub llt: u32,
    pub state: Option<SessionState>,
}

impl SessionInfo {
    pub fn new(session_id: u32) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_state_looks_up_by_name() {
        assert_eq!(
            "SETUP_COMPLETION".parse::<SessionState>().unwrap(),
            SessionState::SetupCompletion
        );
        assert_eq!(SessionState::TransitionConfirmed.to_string(), "TRANSITION_CONFIRMED");
        assert!("BOGUS".parse::<SessionState>().is_err());
    }

    #[test]
    fn session_states_are_ordered() {
        assert!(SessionState::Initial < SessionState::SetupCompletion);
        assert!(SessionState::SetupCompletion < SessionState::TransitionDone);
        assert!(SessionState::TransitionDone < SessionState::TransitionConfirmed);
    }

    #[test]
    fn reason_uses_daemon_names() {
        assert_eq!("REASON_STT".parse::<Reason>().unwrap(), Reason::Stt);
        assert_eq!(Reason::DetachIface.to_string(), "REASON_DETACH_IFACE");
    }

    #[test]
    fn initiator_defaults_to_remote() {
        assert_eq!(Initiator::from_wire("LOCAL"), Initiator::Local);
        assert_eq!(Initiator::from_wire("REMOTE"), Initiator::Remote);
        assert_eq!(Initiator::from_wire("peer"), Initiator::Remote);
    }

    #[test]
    fn respond_status_is_lowercase_on_the_wire() {
        assert_eq!(RespondStatus::Accept.as_ref(), "accept");
        assert_eq!(RespondStatus::Reject.to_string(), "reject");
    }
}
