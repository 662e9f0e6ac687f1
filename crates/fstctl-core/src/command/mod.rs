// ── Command protocol client ──
//
// Every operation is one framed command and one reply. `execute` owns
// the framing and acknowledgement rules; the submodules add one typed
// method per daemon command on `FstCtrl`.

pub mod network;
pub mod session;
pub mod topology;

use fstctl_api::CtrlSocket;
use tracing::{debug, warn};

use crate::controller::{FstCtrl, send_on};
use crate::error::CoreError;
use crate::model::DaemonMode;
use crate::parse::ListError;
use crate::proto;

/// How a non-empty reply is interpreted.
pub(crate) enum Reply<T> {
    /// The reply must start with `OK`.
    Ack,
    /// The reply is decoded; a `FAIL` reply is a rejection.
    Parse(fn(&str) -> Result<T, ReplyError>),
}

/// Failure of a reply decoder, before the command text is attached.
#[derive(Debug)]
pub(crate) enum ReplyError {
    List(ListError),
    Malformed(String),
    Resource(String),
}

impl From<ListError> for ReplyError {
    fn from(err: ListError) -> Self {
        Self::List(err)
    }
}

impl ReplyError {
    fn into_core(self, command: &str) -> CoreError {
        match self {
            Self::List(err) => CoreError::from_list(command, err),
            Self::Malformed(message) => CoreError::Protocol {
                command: command.to_owned(),
                message,
            },
            Self::Resource(message) => CoreError::Resource { message },
        }
    }
}

impl FstCtrl {
    /// Send `prefix` + `body` and interpret the reply.
    ///
    /// An empty reply is success without data (`Ok(None)`).
    pub(crate) async fn execute<T>(
        &self,
        prefix: &str,
        body: &str,
        reply: Reply<T>,
    ) -> Result<Option<T>, CoreError> {
        let command = format!("{prefix}{body}");
        let response = self.round_trip(&command).await?;
        interpret(&command, &response, reply)
    }

    /// [`execute`](Self::execute) for commands answered with `OK`.
    pub(crate) async fn execute_ack(&self, prefix: &str, body: &str) -> Result<(), CoreError> {
        self.execute::<()>(prefix, body, Reply::Ack).await.map(drop)
    }

    /// Classify the daemon behind the control socket.
    ///
    /// Not cached: every mode-sensitive operation probes again.
    pub async fn daemon_mode(&self) -> Result<DaemonMode, CoreError> {
        let guard = self.lock_command().await;
        let socket = guard.as_ref().ok_or(CoreError::Disconnected)?;
        probe_mode(socket).await
    }

    /// Probe the mode and run `command` only against wpa_supplicant, all
    /// under one hold of the command handle.
    pub(crate) async fn station_ack(
        &self,
        operation: &'static str,
        command: &str,
    ) -> Result<(), CoreError> {
        let guard = self.lock_command().await;
        let socket = guard.as_ref().ok_or(CoreError::Disconnected)?;
        require_station(socket, operation).await?;
        let response = send_on(socket, command).await?;
        interpret::<()>(command, &response, Reply::Ack).map(drop)
    }
}

pub(crate) fn interpret<T>(
    command: &str,
    response: &str,
    reply: Reply<T>,
) -> Result<Option<T>, CoreError> {
    if response.is_empty() {
        debug!(command, "empty reply");
        return Ok(None);
    }

    match reply {
        Reply::Ack => {
            if response.starts_with(proto::REPLY_OK) {
                Ok(None)
            } else {
                Err(rejected(command, response))
            }
        }
        Reply::Parse(decode) => {
            if response.starts_with(proto::REPLY_FAIL) {
                return Err(rejected(command, response));
            }
            decode(response)
                .map(Some)
                .map_err(|e| e.into_core(command))
        }
    }
}

pub(crate) fn rejected(command: &str, response: &str) -> CoreError {
    warn!(command, reply = response.trim_end(), "command rejected");
    CoreError::Rejected {
        command: command.to_owned(),
        reply: response.trim_end().to_owned(),
    }
}

/// `INTERFACE_LIST` is a wpa_supplicant global command; hostapd refuses it.
pub(crate) async fn probe_mode(socket: &CtrlSocket) -> Result<DaemonMode, CoreError> {
    let reply = send_on(socket, proto::INTERFACE_LIST).await?;
    let mode = if proto::UNKNOWN_COMMAND_REPLIES
        .iter()
        .any(|p| reply.starts_with(p))
    {
        DaemonMode::AccessPoint
    } else {
        DaemonMode::Station
    };
    debug!(%mode, "daemon mode probed");
    Ok(mode)
}

pub(crate) async fn require_station(
    socket: &CtrlSocket,
    operation: &'static str,
) -> Result<(), CoreError> {
    match probe_mode(socket).await? {
        DaemonMode::Station => Ok(()),
        mode => {
            warn!(operation, %mode, "operation needs wpa_supplicant");
            Err(CoreError::Unsupported { operation, mode })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn count(reply: &str) -> Result<usize, ReplyError> {
        Ok(crate::parse::tokenize(reply)?.len())
    }

    #[test]
    fn empty_reply_is_success_without_data() {
        assert_eq!(interpret("X", "", Reply::Parse(count)).unwrap(), None);
        assert_eq!(interpret::<()>("X", "", Reply::Ack).unwrap(), None);
    }

    #[test]
    fn ack_requires_ok() {
        assert!(interpret::<()>("X", "OK\n", Reply::Ack).is_ok());
        assert!(matches!(
            interpret::<()>("X", "FAIL\n", Reply::Ack),
            Err(CoreError::Rejected { .. })
        ));
        assert!(matches!(
            interpret::<()>("X", "UNKNOWN COMMAND\n", Reply::Ack),
            Err(CoreError::Rejected { .. })
        ));
    }

    #[test]
    fn parsed_fail_is_rejection() {
        let err = interpret("FST-MANAGER LIST_GROUPS", "FAIL\n", Reply::Parse(count)).unwrap_err();
        assert!(
            matches!(&err, CoreError::Rejected { command, reply } if command == "FST-MANAGER LIST_GROUPS" && reply == "FAIL"),
            "got {err:?}"
        );
    }

    #[test]
    fn parsed_reply_is_decoded() {
        assert_eq!(interpret("X", "a b c", Reply::Parse(count)).unwrap(), Some(3));
    }

    #[test]
    fn malformed_reply_is_protocol_error() {
        fn never(_: &str) -> Result<(), ReplyError> {
            Err(ReplyError::Malformed("nope".into()))
        }
        assert!(matches!(
            interpret("X", "data", Reply::Parse(never)),
            Err(CoreError::Protocol { .. })
        ));
    }
}
