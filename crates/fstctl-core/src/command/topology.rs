// ── Discovery and interface management ──

use tracing::info;

use super::{Reply, ReplyError};
use crate::controller::FstCtrl;
use crate::error::CoreError;
use crate::model::{GroupInfo, IfaceInfo, MacAddress, PeerMbies};
use crate::parse;
use crate::proto::{
    FST_ATTACH, FST_DETACH, GET_PEER_MBIES, IFACE_PEERS, INTERFACE_ADD, INTERFACE_REMOVE,
    LIST_GROUPS, LIST_IFACES, MANAGER_PREFIX,
};

impl FstCtrl {
    // ── Discovery ────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Result<Vec<GroupInfo>, CoreError> {
        let groups = self
            .execute(MANAGER_PREFIX, LIST_GROUPS, Reply::Parse(decode_groups))
            .await?;
        Ok(groups.unwrap_or_default())
    }

    /// Interfaces attached to `group`. Malformed records are skipped.
    pub async fn list_group_ifaces(&self, group: &str) -> Result<Vec<IfaceInfo>, CoreError> {
        let ifaces = self
            .execute(
                MANAGER_PREFIX,
                &format!("{LIST_IFACES} {group}"),
                Reply::Parse(decode_ifaces),
            )
            .await?;
        Ok(ifaces.unwrap_or_default())
    }

    /// Peers seen on `iface` within `group`.
    pub async fn list_iface_peers(
        &self,
        group: &str,
        iface: &str,
    ) -> Result<Vec<MacAddress>, CoreError> {
        let peers = self
            .execute(
                MANAGER_PREFIX,
                &format!("{IFACE_PEERS} {group} {iface}"),
                Reply::Parse(decode_peers),
            )
            .await?;
        Ok(peers.unwrap_or_default())
    }

    /// Multi-band information elements `peer` advertised on `iface`.
    ///
    /// A daemon failure reply means the interface/peer pair is unknown.
    pub async fn peer_mbies(&self, iface: &str, peer: MacAddress) -> Result<PeerMbies, CoreError> {
        let result = self
            .execute(
                MANAGER_PREFIX,
                &format!("{GET_PEER_MBIES} {iface} {peer}"),
                Reply::Parse(decode_mbies),
            )
            .await;
        match result {
            Ok(mbies) => Ok(mbies.unwrap_or_else(|| PeerMbies(String::new()))),
            Err(CoreError::Rejected { reply, .. }) => Err(CoreError::InvalidArgument {
                message: format!("no MBIEs for peer {peer} on {iface}: {reply}"),
            }),
            Err(e) => Err(e),
        }
    }

    // ── Interface attach / detach ────────────────────────────────

    /// Attach `iface` to `group` with its priority and llt.
    pub async fn attach_iface(&self, group: &str, iface: &IfaceInfo) -> Result<(), CoreError> {
        self.execute_ack(
            FST_ATTACH,
            &format!(
                " {} {group} llt={} priority={}",
                iface.name, iface.llt, iface.priority
            ),
        )
        .await?;
        info!(group, iface = %iface.name, "interface attached");
        Ok(())
    }

    pub async fn detach_iface(&self, iface: &str) -> Result<(), CoreError> {
        self.execute_ack(FST_DETACH, &format!(" {iface}")).await?;
        info!(iface, "interface detached");
        Ok(())
    }

    // ── Daemon interfaces (wpa_supplicant only) ──────────────────

    /// Ask wpa_supplicant to start managing `iface`.
    pub async fn add_iface(&self, iface: &str) -> Result<(), CoreError> {
        self.station_ack("add_iface", &format!("{INTERFACE_ADD} {iface}"))
            .await
    }

    /// Ask wpa_supplicant to stop managing `iface`.
    pub async fn del_iface(&self, iface: &str) -> Result<(), CoreError> {
        self.station_ack("del_iface", &format!("{INTERFACE_REMOVE} {iface}"))
            .await
    }
}

// ── Reply decoders ──────────────────────────────────────────────────

fn decode_groups(reply: &str) -> Result<Vec<GroupInfo>, ReplyError> {
    Ok(parse::parse_list(reply, parse::parse_group)?)
}

fn decode_ifaces(reply: &str) -> Result<Vec<IfaceInfo>, ReplyError> {
    Ok(parse::parse_list(reply, parse::parse_iface)?)
}

fn decode_peers(reply: &str) -> Result<Vec<MacAddress>, ReplyError> {
    Ok(parse::parse_list(reply, parse::parse_mac)?)
}

fn decode_mbies(reply: &str) -> Result<PeerMbies, ReplyError> {
    let text = reply.trim_end_matches(['\r', '\n']);
    let mut blob = String::new();
    blob.try_reserve_exact(text.len())
        .map_err(|_| ReplyError::Resource(format!("cannot hold {} bytes of MBIEs", text.len())))?;
    blob.push_str(text);
    Ok(PeerMbies(blob))
}
