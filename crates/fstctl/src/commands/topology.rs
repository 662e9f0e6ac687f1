//! Group, interface and peer command handlers.

use serde::Serialize;
use tabled::Tabled;

use fstctl_core::{DaemonMode, FstCtrl, GroupInfo, IfaceInfo, MacAddress, PeerMbies};

use crate::cli::{AttachArgs, GlobalOpts, IfaceArgs, IfaceCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    id: String,
}

impl From<&GroupInfo> for GroupRow {
    fn from(g: &GroupInfo) -> Self {
        Self { id: g.id.clone() }
    }
}

#[derive(Tabled)]
struct IfaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    addr: String,
    #[tabled(rename = "Priority")]
    priority: u32,
    #[tabled(rename = "LLT")]
    llt: u32,
}

impl From<&IfaceInfo> for IfaceRow {
    fn from(i: &IfaceInfo) -> Self {
        Self {
            name: i.name.clone(),
            addr: i.addr.to_string(),
            priority: i.priority,
            llt: i.llt,
        }
    }
}

#[derive(Tabled)]
struct PeerRow {
    #[tabled(rename = "Peer")]
    addr: String,
}

#[derive(Serialize)]
struct MbiesView<'a> {
    iface: &'a str,
    peer: MacAddress,
    mbies: &'a PeerMbies,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn groups(ctrl: &FstCtrl, global: &GlobalOpts) -> Result<(), CliError> {
    let groups = ctrl.list_groups().await?;
    let out = output::render_list(
        &global.output,
        &groups,
        |g| GroupRow::from(g),
        |g| g.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn ifaces(ctrl: &FstCtrl, group: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let ifaces = ctrl.list_group_ifaces(group).await?;
    let out = output::render_list(
        &global.output,
        &ifaces,
        |i| IfaceRow::from(i),
        |i| i.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn peers(
    ctrl: &FstCtrl,
    group: &str,
    iface: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let peers = ctrl.list_iface_peers(group, iface).await?;
    let out = output::render_list(
        &global.output,
        &peers,
        |p| PeerRow {
            addr: p.to_string(),
        },
        MacAddress::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn mbies(
    ctrl: &FstCtrl,
    iface: &str,
    peer: MacAddress,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mbies = ctrl.peer_mbies(iface, peer).await?;
    let view = MbiesView {
        iface,
        peer,
        mbies: &mbies,
    };
    let out = output::render_single(
        &global.output,
        &view,
        |v| v.mbies.to_string(),
        |v| v.mbies.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn attach(ctrl: &FstCtrl, args: AttachArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // The daemon learns the address itself; only name, priority and llt go on the wire.
    let iface = IfaceInfo {
        name: args.iface,
        addr: MacAddress::default(),
        priority: args.priority,
        llt: args.llt,
    };
    ctrl.attach_iface(&args.group, &iface).await?;
    if !global.quiet {
        eprintln!("Interface {} attached to {}", iface.name, args.group);
    }
    Ok(())
}

pub async fn detach(ctrl: &FstCtrl, iface: &str, global: &GlobalOpts) -> Result<(), CliError> {
    ctrl.detach_iface(iface).await?;
    if !global.quiet {
        eprintln!("Interface {iface} detached");
    }
    Ok(())
}

pub async fn iface(ctrl: &FstCtrl, args: IfaceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        IfaceCommand::Add { name } => {
            ctrl.add_iface(&name).await?;
            if !global.quiet {
                eprintln!("Interface {name} added");
            }
        }
        IfaceCommand::Remove { name } => {
            ctrl.del_iface(&name).await?;
            if !global.quiet {
                eprintln!("Interface {name} removed");
            }
        }
    }
    Ok(())
}

pub async fn mode(ctrl: &FstCtrl, global: &GlobalOpts) -> Result<(), CliError> {
    let mode = ctrl.daemon_mode().await?;
    let out = output::render_single(
        &global.output,
        &mode,
        |m| {
            let daemon = match m {
                DaemonMode::Station => "wpa_supplicant",
                DaemonMode::AccessPoint => "hostapd",
            };
            format!("{m} ({daemon})")
        },
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
