use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `fstctl-api` crate.
///
/// Covers every failure mode of a control-interface socket: opening,
/// the attach handshake, request/response traffic, and event reads.
/// `fstctl-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Socket setup ────────────────────────────────────────────────
    /// The daemon's control socket does not exist.
    #[error("Control socket not found: {}", path.display())]
    SocketNotFound { path: PathBuf },

    /// Binding the local socket or connecting it to the daemon failed.
    #[error("Cannot open control socket {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The daemon refused `ATTACH` / `DETACH`.
    #[error("{command} rejected by daemon: {reply:?}")]
    Handshake { command: &'static str, reply: String },

    // ── Transport ───────────────────────────────────────────────────
    /// No reply arrived within the request timeout.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Send or receive on the socket failed.
    #[error("Socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command exceeds the control interface's request size.
    #[error("Command is {len} bytes, limit is {limit}")]
    CommandTooLong { len: usize, limit: usize },
}

impl Error {
    /// Returns `true` if the daemon simply did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
