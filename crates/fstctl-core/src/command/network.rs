// ── Network profile transaction ──
//
// Warms a second band before a transfer: a new open network profile
// pointed at the peer is added and selected on the target interface.
// The four steps run under one hold of the command handle; if any step
// after the profile exists fails, every profile on the interface is
// removed again before the error is returned.

use fstctl_api::CtrlSocket;
use tracing::{debug, error, info, warn};

use super::{Reply, interpret, rejected, require_station};
use crate::controller::{FstCtrl, send_on};
use crate::error::CoreError;
use crate::model::MacAddress;
use crate::parse;
use crate::proto::{
    self, ADD_NETWORK, REMOVE_NETWORK_ALL, REPLY_FAIL, REPLY_OK, SELECT_NETWORK, SET_NETWORK,
};

impl FstCtrl {
    /// Add, configure and select an open network profile for `peer` on
    /// `iface`. Returns the new profile id.
    ///
    /// wpa_supplicant only.
    pub async fn duplicate_connection(
        &self,
        iface: &str,
        peer: MacAddress,
    ) -> Result<u32, CoreError> {
        let guard = self.lock_command().await;
        let socket = guard.as_ref().ok_or(CoreError::Disconnected)?;
        require_station(socket, "duplicate_connection").await?;

        let add = proto::for_iface(iface, ADD_NETWORK);
        let reply = send_on(socket, &add).await?;
        if reply.starts_with(REPLY_FAIL) {
            error!(iface, reply = reply.trim_end(), "ADD_NETWORK failed");
            return Err(rejected(&add, &reply));
        }
        let network_id = parse::parse_u32(&reply).map_err(|e| CoreError::Protocol {
            command: add.clone(),
            message: e.to_string(),
        })?;
        debug!(iface, network_id, "network profile added");

        let steps = [
            format!("{SET_NETWORK} {network_id} bssid {peer}"),
            format!("{SET_NETWORK} {network_id} key_mgmt NONE"),
            format!("{SELECT_NETWORK} {network_id}"),
        ];
        for step in &steps {
            let command = proto::for_iface(iface, step);
            if let Err(e) = expect_ok(socket, &command).await {
                error!(iface, network_id, command = %command, error = %e, "profile step failed; rolling back");
                roll_back(socket, iface).await;
                return Err(e);
            }
        }

        info!(iface, %peer, network_id, "duplicate connection selected");
        Ok(network_id)
    }

    /// Remove every network profile on `iface`.
    ///
    /// wpa_supplicant only.
    pub async fn disconnect_iface(&self, iface: &str) -> Result<(), CoreError> {
        self.station_ack(
            "disconnect_iface",
            &proto::for_iface(iface, REMOVE_NETWORK_ALL),
        )
        .await
    }
}

/// Profile steps need a literal `OK`; an empty reply does not count.
async fn expect_ok(socket: &CtrlSocket, command: &str) -> Result<(), CoreError> {
    let reply = send_on(socket, command).await?;
    if reply.starts_with(REPLY_OK) {
        Ok(())
    } else {
        Err(rejected(command, &reply))
    }
}

async fn roll_back(socket: &CtrlSocket, iface: &str) {
    let command = proto::for_iface(iface, REMOVE_NETWORK_ALL);
    let result = match send_on(socket, &command).await {
        Ok(reply) => interpret::<()>(&command, &reply, Reply::Ack).map(drop),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => warn!(iface, "network profiles rolled back"),
        Err(e) => error!(iface, error = %e, "rollback failed"),
    }
}
