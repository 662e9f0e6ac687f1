//! `monitor`: run the dispatcher and print each notification as it arrives.
//!
//! Table output is one human-readable line per event; structured formats
//! emit one document per event so the stream can be piped.

use std::fmt::Write as _;

use tracing::{debug, warn};

use fstctl_core::{FstCtrl, FstEvent, SessionEvent, SessionState, Shutdown};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(ctrl: &FstCtrl, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output.clone();
    let color = output::should_color(&global.color);
    let quiet = global.quiet;

    ctrl.set_notification_handler(move |event: FstEvent| {
        if quiet {
            return;
        }
        let rendered = render_event(&format, &event, color)
            .and_then(|line| output::print_line(&line));
        if let Err(e) = rendered {
            warn!(error = %e, "cannot print notification");
        }
    });

    let token = ctrl.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            token.cancel();
        }
    });

    let result = ctrl.run().await;
    ctrl.clear_notification_handler();

    match result? {
        Shutdown::Cancelled => Ok(()),
        Shutdown::DaemonTerminating => {
            if !quiet {
                eprintln!("Daemon is terminating");
            }
            Ok(())
        }
        lost @ (Shutdown::EventChannelLost(_) | Shutdown::KeepaliveFailed(_)) => {
            Err(CliError::Daemon {
                message: lost.to_string(),
            })
        }
    }
}

fn render_event(format: &OutputFormat, event: &FstEvent, color: bool) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => describe(event, color),
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(event)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(event)?.trim_end()),
        OutputFormat::Plain => match event {
            FstEvent::PeerStateChanged(_) => "peer".into(),
            FstEvent::Session { session_id, event } => {
                format!("{session_id} {}", event.event_type())
            }
        },
    })
}

/// One-line description of an event.
fn describe(event: &FstEvent, color: bool) -> String {
    let mut line = String::new();
    match event {
        FstEvent::PeerStateChanged(peer) => {
            let state = if peer.connected {
                "connected"
            } else {
                "disconnected"
            };
            let _ = write!(line, "{} {state}", output::label("peer", color));
            if let Some(ifname) = &peer.ifname {
                let _ = write!(line, " ifname={ifname}");
            }
            if let Some(addr) = &peer.addr {
                let _ = write!(line, " addr={addr}");
            }
        }
        FstEvent::Session { session_id, event } => {
            let _ = write!(line, "{} {session_id}", output::label("session", color));
            match event {
                SessionEvent::Established => line.push_str(" established"),
                SessionEvent::Setup => line.push_str(" setup requested"),
                SessionEvent::StateChanged(change) => {
                    let state = |s: Option<SessionState>| {
                        s.map_or_else(|| "?".to_owned(), |s| s.to_string())
                    };
                    let _ = write!(
                        line,
                        " {} -> {}",
                        state(change.old_state),
                        state(change.new_state)
                    );
                    if let Some(to_initial) = &change.to_initial {
                        let mut extra = Vec::new();
                        if let Some(reason) = to_initial.reason {
                            extra.push(format!("reason={reason}"));
                        }
                        if to_initial.reject_code != 0 {
                            extra.push(format!("reject_code={}", to_initial.reject_code));
                        }
                        if let Some(initiator) = to_initial.initiator {
                            extra.push(format!("initiator={initiator}"));
                        }
                        if !extra.is_empty() {
                            let _ = write!(line, " {}", output::muted(&extra.join(" "), color));
                        }
                    }
                }
            }
        }
    }
    line
}
