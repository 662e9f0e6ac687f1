// ── Notification domain types ──
//
// Decoded forms of the unsolicited lines the daemon pushes on the event
// channel. Delivered to the registered notification handler.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::mac::MacAddress;
use super::session::{INVALID_SESSION_ID, Initiator, Reason, SessionState};

/// Kind tag of a session notification, as named by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum SessionEventType {
    #[strum(serialize = "EVENT_FST_ESTABLISHED")]
    Established,
    #[strum(serialize = "EVENT_FST_SETUP")]
    Setup,
    #[strum(to_string = "EVENT_FST_SESSION_STATE", serialize = "STATE_CHANGED")]
    StateChanged,
}

/// A peer appeared on or vanished from an interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeerStateChange {
    pub connected: bool,
    pub ifname: Option<String>,
    pub addr: Option<MacAddress>,
}

/// Extra detail carried when a session falls back to `INITIAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionToInitial {
    pub reason: Option<Reason>,
    pub reject_code: u32,
    pub initiator: Option<Initiator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStateChange {
    pub old_state: Option<SessionState>,
    pub new_state: Option<SessionState>,
    /// Present when `new_state` is `INITIAL`.
    pub to_initial: Option<TransitionToInitial>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    Established,
    Setup,
    StateChanged(SessionStateChange),
}

impl SessionEvent {
    pub fn event_type(&self) -> SessionEventType {
        match self {
            Self::Established => SessionEventType::Established,
            Self::Setup => SessionEventType::Setup,
            Self::StateChanged(_) => SessionEventType::StateChanged,
        }
    }
}

/// A decoded daemon notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FstEvent {
    PeerStateChanged(PeerStateChange),
    Session { session_id: u32, event: SessionEvent },
}

impl FstEvent {
    /// The session this event concerns; [`INVALID_SESSION_ID`] for peer events.
    pub fn session_id(&self) -> u32 {
        match self {
            Self::PeerStateChanged(_) => INVALID_SESSION_ID,
            Self::Session { session_id, .. } => *session_id,
        }
    }
}
