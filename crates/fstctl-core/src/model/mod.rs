// ── Domain model ──
//
// Everything the engine decodes from daemon replies and notifications.
// All values are owned and transient; nothing here is cached.

pub mod event;
pub mod mac;
pub mod session;
pub mod topology;

// ── Re-exports ──────────────────────────────────────────────────────

pub use event::{
    FstEvent, PeerStateChange, SessionEvent, SessionEventType, SessionStateChange,
    TransitionToInitial,
};
pub use mac::{MacAddress, MacParseError};
pub use session::{
    INVALID_SESSION_ID, Initiator, Reason, RespondStatus, SessionInfo, SessionState,
};
pub use topology::{DaemonMode, GroupInfo, IfaceInfo, PeerMbies};
