// ── Session operations ──
//
// Create, inspect and drive FST sessions through the daemon's state
// machine. All commands go out with the `FST-MANAGER ` prefix.

use tracing::info;

use super::{Reply, ReplyError};
use crate::controller::FstCtrl;
use crate::error::CoreError;
use crate::model::{INVALID_SESSION_ID, RespondStatus, SessionInfo};
use crate::parse;
use crate::proto::{
    LIST_SESSIONS, MANAGER_PREFIX, SESSION_ADD, SESSION_GET, SESSION_INITIATE,
    SESSION_REMOVE, SESSION_RESPOND, SESSION_SET, SESSION_TEARDOWN, SESSION_TRANSFER,
};

impl FstCtrl {
    /// Current parameters and state of a session.
    ///
    /// Malformed fields are logged and left at their defaults.
    pub async fn session_info(&self, session_id: u32) -> Result<SessionInfo, CoreError> {
        let info = self
            .execute(
                MANAGER_PREFIX,
                &format!("{SESSION_GET} {session_id}"),
                Reply::Parse(decode_session_info),
            )
            .await?;
        Ok(SessionInfo {
            session_id,
            ..info.unwrap_or_default()
        })
    }

    /// Accept or reject a peer's setup request.
    pub async fn session_respond(
        &self,
        session_id: u32,
        status: RespondStatus,
    ) -> Result<(), CoreError> {
        self.execute_ack(
            MANAGER_PREFIX,
            &format!("{SESSION_RESPOND} {session_id} {status}"),
        )
        .await
    }

    /// Set one session parameter, e.g. `new_ifname` or `llt`.
    pub async fn session_set(
        &self,
        session_id: u32,
        name: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        self.execute_ack(
            MANAGER_PREFIX,
            &format!("{SESSION_SET} {session_id} {name}={value}"),
        )
        .await
    }

    /// Create a session in `group` and return its id.
    pub async fn session_add(&self, group: &str) -> Result<u32, CoreError> {
        let command = format!("{SESSION_ADD} {group}");
        let id = self
            .execute(MANAGER_PREFIX, &command, Reply::Parse(decode_new_session_id))
            .await?
            .ok_or_else(|| CoreError::Protocol {
                command: format!("{MANAGER_PREFIX}{command}"),
                message: "empty reply".into(),
            })?;
        info!(group, session_id = id, "session added");
        Ok(id)
    }

    pub async fn session_remove(&self, session_id: u32) -> Result<(), CoreError> {
        self.session_command(SESSION_REMOVE, session_id).await
    }

    pub async fn session_initiate(&self, session_id: u32) -> Result<(), CoreError> {
        self.session_command(SESSION_INITIATE, session_id).await
    }

    pub async fn session_transfer(&self, session_id: u32) -> Result<(), CoreError> {
        self.session_command(SESSION_TRANSFER, session_id).await
    }

    pub async fn session_teardown(&self, session_id: u32) -> Result<(), CoreError> {
        self.session_command(SESSION_TEARDOWN, session_id).await
    }

    /// Ids of all sessions in `group`.
    pub async fn list_sessions(&self, group: &str) -> Result<Vec<u32>, CoreError> {
        let ids = self
            .execute(
                MANAGER_PREFIX,
                &format!("{LIST_SESSIONS} {group}"),
                Reply::Parse(decode_session_ids),
            )
            .await?;
        Ok(ids.unwrap_or_default())
    }

    async fn session_command(&self, keyword: &str, session_id: u32) -> Result<(), CoreError> {
        self.execute_ack(MANAGER_PREFIX, &format!("{keyword} {session_id}"))
            .await
    }
}

// ── Reply decoders ──────────────────────────────────────────────────

fn decode_session_info(reply: &str) -> Result<SessionInfo, ReplyError> {
    let mut info = SessionInfo::default();
    parse::fold_tokens(reply, &mut info, parse::apply_session_field)?;
    Ok(info)
}

fn decode_new_session_id(reply: &str) -> Result<u32, ReplyError> {
    let id = parse::parse_u32(reply).map_err(|e| ReplyError::Malformed(e.to_string()))?;
    if id == INVALID_SESSION_ID {
        return Err(ReplyError::Malformed(format!(
            "daemon returned the reserved session id {id:#x}"
        )));
    }
    Ok(id)
}

fn decode_session_ids(reply: &str) -> Result<Vec<u32>, ReplyError> {
    Ok(parse::parse_list(reply, parse::parse_session_id)?)
}
