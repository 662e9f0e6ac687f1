// ── Runtime connection configuration ──
//
// Describes *how* to reach the daemon's control socket. Never touches
// disk: the CLI (or any embedding session manager) builds a `CtrlConfig`
// and hands it to `FstCtrl::connect`.

use std::path::PathBuf;
use std::time::Duration;

/// Directory for the client end of each control socket.
pub const DEFAULT_CLIENT_DIR: &str = "/tmp";

/// Configuration for one control-socket connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtrlConfig {
    /// Daemon control socket, e.g. `/var/run/hostapd/global`.
    pub ctrl_path: PathBuf,
    /// Keepalive `PING` period while dispatching. `None` disables it.
    pub ping_interval: Option<Duration>,
    /// Upper bound on every request/response exchange.
    pub request_timeout: Duration,
    /// Where the client sockets are bound.
    pub client_dir: PathBuf,
}

impl CtrlConfig {
    pub fn new(ctrl_path: impl Into<PathBuf>) -> Self {
        Self {
            ctrl_path: ctrl_path.into(),
            ping_interval: None,
            request_timeout: fstctl_api::DEFAULT_REQUEST_TIMEOUT,
            client_dir: PathBuf::from(DEFAULT_CLIENT_DIR),
        }
    }

    /// Keepalive period in whole seconds; 0 disables it.
    pub fn with_ping_interval_secs(mut self, secs: u64) -> Self {
        self.ping_interval = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}
