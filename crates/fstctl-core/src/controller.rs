// ── FST control channel ──
//
// Lifecycle of the two daemon control-socket handles: an attached event
// handle drained by the dispatcher, and a command handle that carries one
// request at a time. Session and topology operations are implemented on
// `FstCtrl` in `crate::command`.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard, PoisonError};

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use fstctl_api::CtrlSocket;

use crate::config::CtrlConfig;
use crate::error::CoreError;
use crate::notify::{self, Flow, NotificationHandler};
use crate::proto;

// ── Shutdown ────────────────────────────────────────────────────────

/// Why [`FstCtrl::run`] stopped dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    /// The shutdown token was cancelled or the channel was disconnected.
    Cancelled,
    /// The daemon announced `CTRL-EVENT-TERMINATING`.
    DaemonTerminating,
    /// Reading the event channel failed.
    EventChannelLost(String),
    /// A keepalive `PING` failed or got no `PONG`.
    KeepaliveFailed(String),
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::DaemonTerminating => f.write_str("daemon is terminating"),
            Self::EventChannelLost(reason) => write!(f, "event channel lost: {reason}"),
            Self::KeepaliveFailed(reason) => write!(f, "keepalive failed: {reason}"),
        }
    }
}

// ── Connection registry ─────────────────────────────────────────────

/// Control socket paths with a live `FstCtrl` in this process.
static CONNECTED: StdMutex<BTreeSet<PathBuf>> = StdMutex::new(BTreeSet::new());

/// Claim on one control socket path, released on drop.
#[derive(Debug)]
struct Registration {
    key: PathBuf,
}

impl Registration {
    fn acquire(path: &Path) -> Result<Self, CoreError> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut connected = CONNECTED.lock().unwrap_or_else(PoisonError::into_inner);
        if !connected.insert(key.clone()) {
            return Err(CoreError::AlreadyConnected {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { key })
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        CONNECTED
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

// ── FstCtrl ─────────────────────────────────────────────────────────

type HandlerSlot = Option<Box<dyn NotificationHandler>>;

/// Connection to one daemon control socket.
///
/// Cheaply cloneable via `Arc<FstCtrlInner>`; clones share both handles.
/// At most one `FstCtrl` per control socket path exists per process.
///
/// Every operation suspends the calling task until its reply arrives or
/// the request timeout elapses. Commands never interleave: the command
/// handle serves one request at a time.
#[derive(Clone)]
pub struct FstCtrl {
    inner: Arc<FstCtrlInner>,
}

struct FstCtrlInner {
    config: CtrlConfig,
    command: Mutex<Option<CtrlSocket>>,
    events: Mutex<Option<CtrlSocket>>,
    handler: StdMutex<HandlerSlot>,
    cancel: CancellationToken,
    registration: StdMutex<Option<Registration>>,
}

impl fmt::Debug for FstCtrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FstCtrl")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl FstCtrl {
    // ── Connection lifecycle ─────────────────────────────────────

    /// Open and attach the event handle, then open the command handle.
    ///
    /// If the command handle cannot be opened, the event handle is
    /// detached and closed again before the error is returned.
    pub async fn connect(config: CtrlConfig) -> Result<Self, CoreError> {
        let registration = Registration::acquire(&config.ctrl_path)?;
        let open = || {
            CtrlSocket::open(
                &config.ctrl_path,
                &config.client_dir,
                config.request_timeout,
            )
        };

        let events = open().map_err(|e| connect_error(&config.ctrl_path, e))?;
        events
            .attach()
            .await
            .map_err(|e| connect_error(&config.ctrl_path, e))?;

        let command = match open() {
            Ok(command) => command,
            Err(e) => {
                if let Err(detach) = events.detach().await {
                    warn!(error = %detach, "cannot detach event channel after failed connect");
                }
                return Err(connect_error(&config.ctrl_path, e));
            }
        };

        info!(
            ctrl = %config.ctrl_path.display(),
            keepalive = ?config.ping_interval,
            "control channel connected"
        );

        Ok(Self {
            inner: Arc::new(FstCtrlInner {
                config,
                command: Mutex::new(Some(command)),
                events: Mutex::new(Some(events)),
                handler: StdMutex::new(None),
                cancel: CancellationToken::new(),
                registration: StdMutex::new(Some(registration)),
            }),
        })
    }

    /// Stop dispatching, detach the event handle and close both handles.
    ///
    /// Operations issued afterwards fail with [`CoreError::Disconnected`].
    /// The control socket path becomes available to `connect` again.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let events = self.inner.events.lock().await.take();
        if let Some(events) = events {
            if let Err(e) = events.detach().await {
                warn!(error = %e, "DETACH failed during disconnect");
            }
        }
        drop(self.inner.command.lock().await.take());
        drop(
            self.inner
                .registration
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );

        info!(ctrl = %self.inner.config.ctrl_path.display(), "control channel disconnected");
    }

    pub fn config(&self) -> &CtrlConfig {
        &self.inner.config
    }

    // ── Notifications ────────────────────────────────────────────

    /// Install the notification handler, replacing any previous one.
    ///
    /// The handler runs on the dispatcher task and must not call
    /// `set_notification_handler` / `clear_notification_handler` itself.
    pub fn set_notification_handler(&self, handler: impl NotificationHandler + 'static) {
        *self.handler_slot() = Some(Box::new(handler));
    }

    /// Remove the handler. Notifications are then dropped.
    pub fn clear_notification_handler(&self) {
        *self.handler_slot() = None;
    }

    /// Token that stops [`run`](Self::run) when cancelled.
    ///
    /// Cancellation is permanent for this connection.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    fn handler_slot(&self) -> StdMutexGuard<'_, HandlerSlot> {
        self.inner
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Dispatcher ───────────────────────────────────────────────

    /// Drain the event channel until a terminal condition.
    ///
    /// Each notification is decoded and delivered to the handler before
    /// the next one is read, and never while a command is awaiting its
    /// reply. With a ping interval configured, a `PING` is
    /// sent whenever the interval elapses; the timer re-arms only after a
    /// `PONG`, and the first failure ends the loop.
    pub async fn run(&self) -> Result<Shutdown, CoreError> {
        let Ok(guard) = self.inner.events.try_lock() else {
            return Err(CoreError::EventChannelBusy);
        };
        let Some(events) = guard.as_ref() else {
            return Err(CoreError::Disconnected);
        };

        let interval = self.inner.config.ping_interval;
        let mut next_ping = interval.map(|period| Instant::now() + period);
        debug!(keepalive = ?interval, "dispatcher started");

        loop {
            tokio::select! {
                biased;
                () = self.inner.cancel.cancelled() => {
                    debug!("dispatcher cancelled");
                    return Ok(Shutdown::Cancelled);
                }
                received = events.recv() => match received {
                    Ok(line) => {
                        // Lines that arrive during a command wait for its reply.
                        let _command = self.inner.command.lock().await;
                        if self.dispatch(&line) == Flow::Terminate {
                            return Ok(self.finish(Shutdown::DaemonTerminating));
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "event channel lost");
                        return Ok(self.finish(Shutdown::EventChannelLost(e.to_string())));
                    }
                },
                () = keepalive_due(next_ping) => match self.ping().await {
                    Ok(()) => next_ping = interval.map(|period| Instant::now() + period),
                    Err(e) => {
                        error!(error = %e, "keepalive failed; stopping dispatcher");
                        return Ok(self.finish(Shutdown::KeepaliveFailed(e.to_string())));
                    }
                },
            }
        }
    }

    fn dispatch(&self, line: &str) -> Flow {
        let mut slot = self.handler_slot();
        notify::demux(line, slot.as_deref_mut().map(|h| h as &mut dyn NotificationHandler))
    }

    /// A terminal shutdown also cancels the connection, so a later `run`
    /// returns [`Shutdown::Cancelled`] at once.
    fn finish(&self, shutdown: Shutdown) -> Shutdown {
        self.inner.cancel.cancel();
        shutdown
    }

    /// Send `PING` and require `PONG`.
    pub async fn ping(&self) -> Result<(), CoreError> {
        let reply = self.round_trip(proto::PING).await?;
        if reply.starts_with(proto::PONG) {
            trace!("keepalive PONG");
            Ok(())
        } else {
            Err(CoreError::Protocol {
                command: proto::PING.into(),
                message: format!("expected {}, got {:?}", proto::PONG, reply.trim_end()),
            })
        }
    }

    // ── Command channel ──────────────────────────────────────────

    /// Send one raw command and return the raw reply.
    pub async fn round_trip(&self, command: &str) -> Result<String, CoreError> {
        let guard = self.lock_command().await;
        let socket = guard.as_ref().ok_or(CoreError::Disconnected)?;
        send_on(socket, command).await
    }

    /// Exclusive hold on the command handle, for multi-step exchanges.
    pub(crate) async fn lock_command(&self) -> MutexGuard<'_, Option<CtrlSocket>> {
        self.inner.command.lock().await
    }
}

/// One request/response exchange on an already-held command handle.
pub(crate) async fn send_on(socket: &CtrlSocket, command: &str) -> Result<String, CoreError> {
    debug!(command, "sending command");
    match socket.request(command).await {
        Ok(reply) => {
            debug!(command, reply = reply.trim_end(), "reply received");
            Ok(reply)
        }
        Err(e) if e.is_timeout() => {
            warn!(command, error = %e, "command timed out");
            Err(e.into())
        }
        Err(e) => {
            error!(command, error = %e, "command transport failed");
            Err(e.into())
        }
    }
}

async fn keepalive_due(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn connect_error(path: &Path, err: fstctl_api::Error) -> CoreError {
    match CoreError::from(err) {
        CoreError::ConnectionFailed { reason, .. } => CoreError::ConnectionFailed {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    }
}
