//! Hosts and their attributes.

use fabric_primitives::{HostId, Nqn};
use tracing::debug;

use crate::{Subsystem, TopologyResult};

/// A host identity and the subsystems it connects to.
#[derive(Debug, Clone)]
pub struct Host {
    hostnqn: Nqn,
    hostid: Option<HostId>,
    dhchap_key: Option<String>,
    hostsymname: Option<String>,
    pdc_enabled: Option<bool>,
    subsystems: Vec<Subsystem>,
}

impl Host {
    pub(crate) fn new(hostnqn: Nqn, hostid: Option<HostId>) -> Self {
        Self {
            hostnqn,
            hostid,
            dhchap_key: None,
            hostsymname: None,
            pdc_enabled: None,
            subsystems: Vec::new(),
        }
    }

    /// Returns the host NQN.
    #[must_use]
    pub fn hostnqn(&self) -> &Nqn {
        &self.hostnqn
    }

    /// Returns the host identifier.
    #[must_use]
    pub fn hostid(&self) -> Option<&HostId> {
        self.hostid.as_ref()
    }

    /// Returns the host DH-HMAC-CHAP key.
    #[must_use]
    pub fn dhchap_key(&self) -> Option<&str> {
        self.dhchap_key.as_deref()
    }

    /// Sets the host DH-HMAC-CHAP key. The key is kept in its textual
    /// `DHHC-1:...` form, which is what the kernel consumes.
    pub fn set_dhchap_key(&mut self, key: impl Into<String>) {
        self.dhchap_key = Some(key.into());
    }

    /// Returns the symbolic host name.
    #[must_use]
    pub fn hostsymname(&self) -> Option<&str> {
        self.hostsymname.as_deref()
    }

    /// Sets the symbolic host name.
    pub fn set_hostsymname(&mut self, name: impl Into<String>) {
        self.hostsymname = Some(name.into());
    }

    /// Returns the persistent discovery controller setting; `None` when it
    /// was never configured.
    #[must_use]
    pub const fn pdc_enabled(&self) -> Option<bool> {
        self.pdc_enabled
    }

    /// Configures persistent discovery controllers.
    pub fn set_pdc_enabled(&mut self, enabled: bool) {
        self.pdc_enabled = Some(enabled);
    }

    /// Returns the subsystems in creation order.
    #[must_use]
    pub fn subsystems(&self) -> &[Subsystem] {
        &self.subsystems
    }

    /// Finds the first subsystem with the given NQN, creating it when none
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TopologyError::InvalidIdentity`] when `nqn` is not a
    /// valid NQN.
    pub fn lookup_subsystem(&mut self, nqn: &str) -> TopologyResult<&mut Subsystem> {
        let index = match self.subsystems.iter().position(|s| s.nqn() == nqn) {
            Some(index) => index,
            None => self.push_subsystem(Nqn::new(nqn)?),
        };
        Ok(&mut self.subsystems[index])
    }

    /// Appends a new subsystem without looking for an existing one.
    ///
    /// Discovery subsystems share a single NQN, so each discovery controller
    /// gets its own subsystem through this method.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TopologyError::InvalidIdentity`] when `nqn` is not a
    /// valid NQN.
    pub fn add_subsystem(&mut self, nqn: &str) -> TopologyResult<&mut Subsystem> {
        let index = self.push_subsystem(Nqn::new(nqn)?);
        Ok(&mut self.subsystems[index])
    }

    fn push_subsystem(&mut self, nqn: Nqn) -> usize {
        debug!(hostnqn = %self.hostnqn, subsysnqn = %nqn, "creating subsystem");
        self.subsystems.push(Subsystem::new(nqn));
        self.subsystems.len() - 1
    }
}
