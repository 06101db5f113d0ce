//! Local node identity resolution
//!
//! Maps the statically configured peer list onto the addresses bound to this
//! host. The matching peer's 1-based position is the node's ordinal, which
//! every other member derives the same way, so `node-<ordinal>` names agree
//! across the cluster without any coordination.

use serde::Serialize;
use std::net::IpAddr;

use crate::config::IdentityPolicy;
use crate::error::{BootstrapError, BootstrapResult};
use shared::{process_debug, process_warn, ProcessId};

/// An address bound to a local network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalAddress {
    pub interface: String,
    pub ip: IpAddr,
}

impl LocalAddress {
    pub fn new(interface: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            interface: interface.into(),
            ip,
        }
    }

    /// Exact textual match; IPv6 may also be written with its zone
    pub fn matches(&self, peer: &str) -> bool {
        let plain = self.ip.to_string();
        if peer == plain {
            return true;
        }
        self.ip.is_ipv6() && peer == format!("{plain}%{}", self.interface)
    }
}

/// This host's place in the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeIdentity {
    /// 1-based position in the peer list
    pub ordinal: usize,
    /// The peer entry exactly as supplied
    pub address: String,
}

impl NodeIdentity {
    pub fn name(&self) -> String {
        node_name(self.ordinal)
    }

    pub fn process_id(&self) -> ProcessId {
        ProcessId::Node(self.ordinal)
    }
}

/// Node name for a 1-based ordinal
pub fn node_name(ordinal: usize) -> String {
    format!("node-{ordinal}")
}

/// Resolve which peer this host is
///
/// `local` must be in interface enumeration order; with
/// [`IdentityPolicy::LastMatch`] the last matching entry wins.
pub fn resolve(peers: &[String], local: &[LocalAddress], policy: IdentityPolicy) -> BootstrapResult<NodeIdentity> {
    let matched: Vec<(usize, &LocalAddress)> = local
        .iter()
        .filter_map(|address| {
            peers
                .iter()
                .position(|peer| address.matches(peer))
                .map(|index| (index, address))
        })
        .collect();

    let Some(&(last_index, last_address)) = matched.last() else {
        return Err(BootstrapError::HostNotFound {
            peers: format!("[{}]", peers.join(", ")),
        });
    };

    let mut distinct: Vec<usize> = matched.iter().map(|(index, _)| *index).collect();
    distinct.sort_unstable();
    distinct.dedup();

    if distinct.len() > 1 {
        let candidates = distinct
            .iter()
            .map(|index| peers[*index].as_str())
            .collect::<Vec<_>>()
            .join(", ");
        match policy {
            IdentityPolicy::Reject => return Err(BootstrapError::AmbiguousHost { candidates }),
            IdentityPolicy::LastMatch => {
                process_warn!(
                    ProcessId::current(),
                    "⚠️ Several local addresses are listed peers ({}); using {} from {}",
                    candidates,
                    peers[last_index],
                    last_address.interface
                );
            }
        }
    }

    process_debug!(
        ProcessId::current(),
        "🔎 Matched peer {} on interface {}",
        peers[last_index],
        last_address.interface
    );

    Ok(NodeIdentity {
        ordinal: last_index + 1,
        address: peers[last_index].clone(),
    })
}
