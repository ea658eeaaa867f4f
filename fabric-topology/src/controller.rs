//! Controllers (connection endpoints) of a subsystem.

use fabric_primitives::Transport;

use crate::FabricsConfig;

/// Addressing key that identifies a controller within its subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerKey {
    transport: Transport,
    traddr: Option<String>,
    host_traddr: Option<String>,
    host_iface: Option<String>,
    trsvcid: Option<String>,
}

impl ControllerKey {
    /// Creates a key with only the transport set.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            traddr: None,
            host_traddr: None,
            host_iface: None,
            trsvcid: None,
        }
    }

    /// Sets the target address.
    #[must_use]
    pub fn with_traddr(mut self, traddr: impl Into<String>) -> Self {
        self.traddr = Some(traddr.into());
        self
    }

    /// Sets the host-side address.
    #[must_use]
    pub fn with_host_traddr(mut self, host_traddr: impl Into<String>) -> Self {
        self.host_traddr = Some(host_traddr.into());
        self
    }

    /// Sets the host interface.
    #[must_use]
    pub fn with_host_iface(mut self, host_iface: impl Into<String>) -> Self {
        self.host_iface = Some(host_iface.into());
        self
    }

    /// Sets the target service identifier.
    #[must_use]
    pub fn with_trsvcid(mut self, trsvcid: impl Into<String>) -> Self {
        self.trsvcid = Some(trsvcid.into());
        self
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the target address.
    #[must_use]
    pub fn traddr(&self) -> Option<&str> {
        self.traddr.as_deref()
    }

    /// Returns the host-side address.
    #[must_use]
    pub fn host_traddr(&self) -> Option<&str> {
        self.host_traddr.as_deref()
    }

    /// Returns the host interface.
    #[must_use]
    pub fn host_iface(&self) -> Option<&str> {
        self.host_iface.as_deref()
    }

    /// Returns the target service identifier.
    #[must_use]
    pub fn trsvcid(&self) -> Option<&str> {
        self.trsvcid.as_deref()
    }
}

/// A configured connection to a subsystem.
#[derive(Debug, Clone)]
pub struct Controller {
    key: ControllerKey,
    name: Option<String>,
    config: FabricsConfig,
    dhchap_host_key: Option<String>,
    dhchap_ctrl_key: Option<String>,
    persistent: bool,
    discovery: bool,
}

impl Controller {
    pub(crate) fn new(key: ControllerKey) -> Self {
        Self {
            key,
            name: None,
            config: FabricsConfig::default(),
            dhchap_host_key: None,
            dhchap_ctrl_key: None,
            persistent: false,
            discovery: false,
        }
    }

    /// Returns the addressing key.
    #[must_use]
    pub fn key(&self) -> &ControllerKey {
        &self.key
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        self.key.transport()
    }

    /// Returns the device name assigned at connect time, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Records the device name assigned at connect time.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the fabrics tunables.
    #[must_use]
    pub fn config(&self) -> &FabricsConfig {
        &self.config
    }

    /// Returns the fabrics tunables for modification.
    pub fn config_mut(&mut self) -> &mut FabricsConfig {
        &mut self.config
    }

    /// Returns the host DH-HMAC-CHAP key.
    #[must_use]
    pub fn dhchap_host_key(&self) -> Option<&str> {
        self.dhchap_host_key.as_deref()
    }

    /// Sets the host DH-HMAC-CHAP key, kept in its textual `DHHC-1:...` form.
    pub fn set_dhchap_host_key(&mut self, key: impl Into<String>) {
        self.dhchap_host_key = Some(key.into());
    }

    /// Returns the controller DH-HMAC-CHAP key used for bidirectional authentication.
    #[must_use]
    pub fn dhchap_ctrl_key(&self) -> Option<&str> {
        self.dhchap_ctrl_key.as_deref()
    }

    /// Sets the controller DH-HMAC-CHAP key, kept in its textual `DHHC-1:...` form.
    pub fn set_dhchap_ctrl_key(&mut self, key: impl Into<String>) {
        self.dhchap_ctrl_key = Some(key.into());
    }

    /// Returns `true` if the connection should survive disconnect of its users.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Marks the controller persistent.
    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    /// Returns `true` for a discovery controller.
    #[must_use]
    pub const fn is_discovery(&self) -> bool {
        self.discovery
    }

    /// Marks the controller as a discovery controller.
    pub fn set_discovery(&mut self, discovery: bool) {
        self.discovery = discovery;
    }
}
