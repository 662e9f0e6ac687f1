// ── Groups, interfaces, peers ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::mac::MacAddress;

/// An FST group: a set of interfaces that may carry the same session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: String,
}

/// An interface attached to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfaceInfo {
    pub name: String,
    pub addr: MacAddress,
    pub priority: u32,
    /// Link-lifetime timer.
    pub llt: u32,
}

/// Multi-band information elements of a peer, verbatim from the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerMbies(pub String);

impl PeerMbies {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerMbies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which daemon is on the other end of the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DaemonMode {
    /// wpa_supplicant
    Station,
    /// hostapd
    AccessPoint,
}
