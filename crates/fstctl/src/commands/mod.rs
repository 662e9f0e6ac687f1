//! Command dispatch: bridges CLI args -> `FstCtrl` operations -> output formatting.

pub mod config_cmd;
pub mod monitor;
pub mod network;
pub mod sessions;
pub mod topology;

use fstctl_core::FstCtrl;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a daemon-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctrl: &FstCtrl, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Groups => topology::groups(ctrl, global).await,
        Command::Ifaces { group } => topology::ifaces(ctrl, &group, global).await,
        Command::Peers { group, iface } => topology::peers(ctrl, &group, &iface, global).await,
        Command::Mbies { iface, peer } => topology::mbies(ctrl, &iface, peer, global).await,
        Command::Attach(args) => topology::attach(ctrl, args, global).await,
        Command::Detach { iface } => topology::detach(ctrl, &iface, global).await,
        Command::Iface(args) => topology::iface(ctrl, args, global).await,
        Command::Mode => topology::mode(ctrl, global).await,
        Command::Sessions { group } => sessions::list(ctrl, &group, global).await,
        Command::Session(args) => sessions::handle(ctrl, args, global).await,
        Command::DupConnection { iface, peer } => {
            network::dup_connection(ctrl, &iface, peer, global).await
        }
        Command::Disconnect { iface } => network::disconnect(ctrl, &iface, global).await,
        Command::Monitor(_) => monitor::handle(ctrl, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
