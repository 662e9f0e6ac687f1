//! FST control-channel engine for hostapd / wpa_supplicant.
//!
//! Speaks the daemon's textual control interface on behalf of a
//! fast-session-transfer session manager:
//!
//! - **[`FstCtrl`]**: the connection. [`connect()`](FstCtrl::connect)
//!   opens an attached event handle and a command handle on one control
//!   socket; [`run()`](FstCtrl::run) drains notifications into the
//!   registered [`NotificationHandler`] and optionally keeps the link alive
//!   with `PING`/`PONG`.
//!
//! - **Operations** ([`command`]): one async method per daemon command,
//!   covering session lifecycle, group/interface/peer discovery, interface
//!   attach/detach and the duplicate-connection transaction with rollback.
//!
//! - **Parsing** ([`parse`], [`notify`]): the tokenize-then-decode list
//!   parser shared by every list reply, and the notification
//!   demultiplexer.
//!
//! - **Domain model** ([`model`]): `MacAddress`, session and topology
//!   records, and the closed [`FstEvent`] notification type.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod notify;
pub mod parse;
pub mod proto;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::CtrlConfig;
pub use controller::{FstCtrl, Shutdown};
pub use error::CoreError;
pub use notify::{Flow, NotificationHandler};
pub use parse::{ListError, ParseError};

pub use model::{
    DaemonMode, FstEvent, GroupInfo, INVALID_SESSION_ID, IfaceInfo, Initiator, MacAddress,
    PeerMbies, PeerStateChange, Reason, RespondStatus, SessionEvent, SessionEventType,
    SessionInfo, SessionState, SessionStateChange, TransitionToInitial,
};
