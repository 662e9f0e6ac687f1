// ── Core error types ──
//
// Errors returned by `FstCtrl` operations. Socket-level failures from
// `fstctl-api` are translated by the `From` impl below; reply-level
// failures are produced by the command layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::DaemonMode;
use crate::parse::ListError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to control socket {}: {reason}", path.display())]
    ConnectionFailed { path: PathBuf, reason: String },

    #[error("Control socket {} already has a connection in this process", path.display())]
    AlreadyConnected { path: PathBuf },

    #[error("Control channel is closed")]
    Disconnected,

    #[error("Event channel is already being dispatched")]
    EventChannelBusy,

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Daemon did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Control socket transport error: {message}")]
    Transport { message: String },

    #[error("Command is {len} bytes, limit is {limit}")]
    CommandTooLong { len: usize, limit: usize },

    // ── Reply errors ─────────────────────────────────────────────────
    #[error("Malformed reply to {command:?}: {message}")]
    Protocol { command: String, message: String },

    #[error("Daemon rejected {command:?}: {reply}")]
    Rejected { command: String, reply: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Out of resources: {message}")]
    Resource { message: String },

    // ── Mode errors ──────────────────────────────────────────────────
    #[error("Operation not supported: {operation} (daemon is in {mode} mode)")]
    Unsupported {
        operation: &'static str,
        mode: DaemonMode,
    },
}

impl CoreError {
    /// Returns `true` for failures of the socket itself rather than of a reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Transport { .. } | Self::Disconnected
        )
    }

    /// Map a list-building failure for `command`.
    pub(crate) fn from_list(command: &str, err: ListError) -> Self {
        match err {
            ListError::Overflow { .. } => Self::Protocol {
                command: command.to_owned(),
                message: err.to_string(),
            },
            ListError::Alloc { .. } => Self::Resource {
                message: err.to_string(),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fstctl_api::Error> for CoreError {
    fn from(err: fstctl_api::Error) -> Self {
        match err {
            fstctl_api::Error::SocketNotFound { path } => CoreError::ConnectionFailed {
                path,
                reason: "socket does not exist".into(),
            },
            fstctl_api::Error::Open { path, source } => CoreError::ConnectionFailed {
                path,
                reason: source.to_string(),
            },
            fstctl_api::Error::Handshake { command, reply } => CoreError::ConnectionFailed {
                path: PathBuf::new(),
                reason: format!("{command} refused: {}", reply.trim_end()),
            },
            fstctl_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            fstctl_api::Error::Io(e) => CoreError::Transport {
                message: e.to_string(),
            },
            fstctl_api::Error::CommandTooLong { len, limit } => {
                CoreError::CommandTooLong { len, limit }
            }
        }
    }
}
