//! Subsystems reachable from a host.

use fabric_primitives::Nqn;
use tracing::debug;

use crate::{Controller, ControllerKey};

/// A storage subsystem and the controllers connecting to it.
#[derive(Debug, Clone)]
pub struct Subsystem {
    nqn: Nqn,
    name: Option<String>,
    application: Option<String>,
    controllers: Vec<Controller>,
}

impl Subsystem {
    pub(crate) fn new(nqn: Nqn) -> Self {
        Self {
            nqn,
            name: None,
            application: None,
            controllers: Vec::new(),
        }
    }

    /// Returns the subsystem NQN.
    #[must_use]
    pub fn nqn(&self) -> &Nqn {
        &self.nqn
    }

    /// Returns `true` for a discovery subsystem.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        self.nqn.is_discovery()
    }

    /// Returns the device name assigned by the kernel, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Records the device name assigned by the kernel.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the application tag.
    #[must_use]
    pub fn application(&self) -> Option<&str> {
        self.application.as_deref()
    }

    /// Sets the application tag.
    pub fn set_application(&mut self, application: impl Into<String>) {
        self.application = Some(application.into());
    }

    /// Returns the controllers in creation order.
    #[must_use]
    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// Returns the controller matching `key` exactly, if one exists.
    #[must_use]
    pub fn find_ctrl(&self, key: &ControllerKey) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.key() == key)
    }

    /// Finds the controller with the given addressing key, creating it when
    /// no controller matches.
    pub fn lookup_ctrl(&mut self, key: ControllerKey) -> &mut Controller {
        let index = match self.controllers.iter().position(|c| c.key() == &key) {
            Some(index) => index,
            None => {
                debug!(subsysnqn = %self.nqn, transport = %key.transport(), "creating controller");
                self.controllers.push(Controller::new(key));
                self.controllers.len() - 1
            }
        };
        &mut self.controllers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_primitives::Transport;

    #[test]
    fn lookup_ctrl_matches_on_full_key() {
        let mut subsys = Subsystem::new(Nqn::new("nqn.2019-10.com.example:s1").unwrap());
        let key = ControllerKey::new(Transport::Tcp)
            .with_traddr("10.0.0.1")
            .with_trsvcid("4420");
        subsys.lookup_ctrl(key.clone()).config_mut().queue_size = 64;
        assert_eq!(subsys.lookup_ctrl(key).config().queue_size, 64);

        let other = ControllerKey::new(Transport::Tcp).with_traddr("10.0.0.1");
        assert_eq!(subsys.lookup_ctrl(other).config().queue_size, 0);
        assert_eq!(subsys.controllers().len(), 2);
    }
}
