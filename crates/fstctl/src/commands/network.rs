//! Network profile handlers (wpa_supplicant only).

use serde::Serialize;

use fstctl_core::{FstCtrl, MacAddress};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Duplicated<'a> {
    iface: &'a str,
    peer: MacAddress,
    network_id: u32,
}

pub async fn dup_connection(
    ctrl: &FstCtrl,
    iface: &str,
    peer: MacAddress,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let network_id = ctrl.duplicate_connection(iface, peer).await?;
    let view = Duplicated {
        iface,
        peer,
        network_id,
    };
    let out = output::render_single(
        &global.output,
        &view,
        |v| format!("Network {} selected on {} for {}", v.network_id, v.iface, v.peer),
        |v| v.network_id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn disconnect(ctrl: &FstCtrl, iface: &str, global: &GlobalOpts) -> Result<(), CliError> {
    ctrl.disconnect_iface(iface).await?;
    if !global.quiet {
        eprintln!("All networks removed from {iface}");
    }
    Ok(())
}
