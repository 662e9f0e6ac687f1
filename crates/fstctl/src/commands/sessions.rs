//! Session command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use fstctl_core::{FstCtrl, SessionInfo};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Session")]
    id: u32,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(ctrl: &FstCtrl, group: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let ids = ctrl.list_sessions(group).await?;
    let out = output::render_list(
        &global.output,
        &ids,
        |id| SessionRow { id: *id },
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(ctrl: &FstCtrl, args: SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SessionCommand::Info { id } => {
            let info = ctrl.session_info(id).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &info,
                |i| detail(i, color),
                |i| i.session_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
        }

        SessionCommand::Add { group } => {
            let id = ctrl.session_add(&group).await?;
            output::print_output(&id.to_string(), global.quiet);
        }

        SessionCommand::Remove { id } => {
            ctrl.session_remove(id).await?;
            done(global, &format!("Session {id} removed"));
        }

        SessionCommand::Initiate { id } => {
            ctrl.session_initiate(id).await?;
            done(global, &format!("Session {id} setup initiated"));
        }

        SessionCommand::Transfer { id } => {
            ctrl.session_transfer(id).await?;
            done(global, &format!("Session {id} transfer requested"));
        }

        SessionCommand::Teardown { id } => {
            ctrl.session_teardown(id).await?;
            done(global, &format!("Session {id} torn down"));
        }

        SessionCommand::Respond { id, status } => {
            ctrl.session_respond(id, status.into()).await?;
            done(global, &format!("Session {id} answered"));
        }

        SessionCommand::Set { id, name, value } => {
            ctrl.session_set(id, &name, &value).await?;
            done(global, &format!("Session {id}: {name} = {value}"));
        }
    }
    Ok(())
}

fn done(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

/// Key/value view of one session for table output.
fn detail(info: &SessionInfo, color: bool) -> String {
    fn or_none<T: ToString>(value: Option<&T>) -> String {
        value.map_or_else(|| "-".into(), ToString::to_string)
    }

    let fields = [
        ("session", info.session_id.to_string()),
        ("state", or_none(info.state.as_ref())),
        ("old_ifname", or_none(info.old_ifname.as_ref())),
        ("new_ifname", or_none(info.new_ifname.as_ref())),
        ("old_peer_addr", or_none(info.old_peer_addr.as_ref())),
        ("new_peer_addr", or_none(info.new_peer_addr.as_ref())),
        ("llt", info.llt.to_string()),
    ];

    let mut out = String::new();
    for (key, value) in fields {
        let _ = writeln!(out, "{:<15} {value}", output::label(key, color));
    }
    out.trim_end().to_owned()
}
