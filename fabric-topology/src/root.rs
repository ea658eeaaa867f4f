//! Topology root.

use fabric_primitives::{HostId, Nqn};
use tracing::debug;

use crate::{Host, TopologyResult};

/// Root of the live topology tree.
#[derive(Debug, Clone, Default)]
pub struct Root {
    hosts: Vec<Host>,
}

impl Root {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hosts in creation order.
    #[must_use]
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Returns `true` when no host has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Finds the host with the given NQN and host ID, creating it when none
    /// matches.
    ///
    /// A host matches when the NQN is equal and either no host ID is
    /// requested or both IDs are equal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TopologyError::InvalidIdentity`] when `hostnqn` is
    /// not a valid NQN.
    pub fn lookup_host(&mut self, hostnqn: &str, hostid: Option<&str>) -> TopologyResult<&mut Host> {
        let found = self.hosts.iter().position(|h| {
            h.hostnqn() == hostnqn
                && hostid.is_none_or(|id| h.hostid().is_some_and(|own| own.as_str() == id))
        });
        let index = match found {
            Some(index) => index,
            None => {
                let nqn = Nqn::new(hostnqn)?;
                debug!(hostnqn = %nqn, hostid = ?hostid, "creating host");
                self.hosts.push(Host::new(nqn, hostid.map(HostId::new)));
                self.hosts.len() - 1
            }
        };
        Ok(&mut self.hosts[index])
    }
}
