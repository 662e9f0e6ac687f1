// Control interface socket client
//
// One `CtrlSocket` is one Unix datagram socket bound to a private client
// path and connected to the daemon's control socket. The same daemon
// accepts any number of such clients; a client that sends `ATTACH`
// additionally receives the daemon's unsolicited event lines.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::net::UnixDatagram;
use tracing::{debug, trace, warn};

use crate::error::Error;

/// Longest command the daemon accepts in a single request.
pub const MAX_COMMAND_LEN: usize = 255;

/// Size of the receive buffer for replies and events.
pub const REPLY_BUFFER_SIZE: usize = 4096;

/// Request timeout used by the daemon's own command-line client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CLIENT_SOCKET_PREFIX: &str = "fstctl_";

static CLIENT_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A single client handle on a daemon control socket.
///
/// The local socket file is removed when the handle is dropped.
#[derive(Debug)]
pub struct CtrlSocket {
    socket: UnixDatagram,
    ctrl_path: PathBuf,
    local_path: PathBuf,
    timeout: Duration,
}

impl CtrlSocket {
    /// Open a client handle on the control socket at `ctrl_path`.
    ///
    /// The local end is bound inside `client_dir` as
    /// `fstctl_<pid>-<counter>`. Must be called within a Tokio runtime.
    pub fn open(ctrl_path: &Path, client_dir: &Path, timeout: Duration) -> Result<Self, Error> {
        if !ctrl_path.exists() {
            return Err(Error::SocketNotFound {
                path: ctrl_path.to_path_buf(),
            });
        }

        let counter = CLIENT_COUNTER.fetch_add(1, Ordering::Relaxed);
        let local_path = client_dir.join(format!(
            "{CLIENT_SOCKET_PREFIX}{}-{counter}",
            std::process::id()
        ));

        let socket = match UnixDatagram::bind(&local_path) {
            Ok(socket) => socket,
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                // Left behind by an earlier process that had our pid.
                warn!(path = %local_path.display(), "removing stale client socket");
                let _ = std::fs::remove_file(&local_path);
                UnixDatagram::bind(&local_path).map_err(|source| Error::Open {
                    path: ctrl_path.to_path_buf(),
                    source,
                })?
            }
            Err(source) => {
                return Err(Error::Open {
                    path: ctrl_path.to_path_buf(),
                    source,
                });
            }
        };

        if let Err(source) = socket.connect(ctrl_path) {
            let _ = std::fs::remove_file(&local_path);
            return Err(Error::Open {
                path: ctrl_path.to_path_buf(),
                source,
            });
        }

        debug!(
            ctrl = %ctrl_path.display(),
            local = %local_path.display(),
            "control socket opened"
        );

        Ok(Self {
            socket,
            ctrl_path: ctrl_path.to_path_buf(),
            local_path,
            timeout,
        })
    }

    /// The daemon socket this handle is connected to.
    pub fn ctrl_path(&self) -> &Path {
        &self.ctrl_path
    }

    /// The private client socket path.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// The per-request reply timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Request / response ──────────────────────────────────────────

    /// Send `command` and wait for its reply.
    ///
    /// Anything already queued on the handle is discarded first, and
    /// event lines (those starting with `<`) that arrive while waiting
    /// are skipped. The whole exchange is bounded by the
    /// handle's timeout.
    pub async fn request(&self, command: &str) -> Result<String, Error> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(Error::CommandTooLong {
                len: command.len(),
                limit: MAX_COMMAND_LEN,
            });
        }

        let mut buf = vec![0u8; REPLY_BUFFER_SIZE];
        self.discard_stale(&mut buf)?;

        self.socket.send(command.as_bytes()).await?;

        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            let Ok(received) = tokio::time::timeout_at(deadline, self.socket.recv(&mut buf)).await
            else {
                return Err(Error::Timeout {
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            };
            let len = received?;
            let reply = String::from_utf8_lossy(&buf[..len]).into_owned();

            if reply.starts_with('<') {
                trace!(line = %reply, "skipping unsolicited line on command socket");
                continue;
            }
            return Ok(reply);
        }
    }

    /// Drop datagrams queued before a new request, such as the late reply
    /// to a request that already timed out.
    fn discard_stale(&self, buf: &mut [u8]) -> Result<(), Error> {
        loop {
            match self.socket.try_recv(buf) {
                Ok(len) => {
                    trace!(
                        line = %String::from_utf8_lossy(&buf[..len]),
                        "discarding stale datagram on command socket"
                    );
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Register this handle for unsolicited event delivery.
    pub async fn attach(&self) -> Result<(), Error> {
        self.handshake("ATTACH").await
    }

    /// Stop event delivery to this handle.
    pub async fn detach(&self) -> Result<(), Error> {
        self.handshake("DETACH").await
    }

    async fn handshake(&self, command: &'static str) -> Result<(), Error> {
        let reply = self.request(command).await?;
        if reply.starts_with("OK") {
            debug!(command, "handshake accepted");
            Ok(())
        } else {
            Err(Error::Handshake { command, reply })
        }
    }

    // ── Event reads ─────────────────────────────────────────────────

    /// Wait for the next datagram pushed by the daemon.
    ///
    /// Cancel-safe: dropping the future loses no data.
    pub async fn recv(&self) -> Result<String, Error> {
        let mut buf = vec![0u8; REPLY_BUFFER_SIZE];
        let len = self.socket.recv(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }
}

impl Drop for CtrlSocket {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.local_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.local_path.display(), error = %e, "cannot remove client socket");
            }
        }
    }
}
