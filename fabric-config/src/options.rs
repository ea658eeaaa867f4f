//! Persistence options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Location most tools read the fabrics configuration from.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nvme/config.json";

/// Tunables for loading and storing configuration documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    config_path: PathBuf,
    default_keyring: String,
    pretty: bool,
}

impl ConfigOptions {
    /// Creates options with the default path, keyring, and pretty printing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path used by [`crate::FabricConfig::load_default`] and
    /// [`crate::FabricConfig::store_default`].
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Sets the description of the keyring TLS keys are inserted into when a
    /// record names none.
    #[must_use]
    pub fn with_default_keyring(mut self, description: impl Into<String>) -> Self {
        self.default_keyring = description.into();
        self
    }

    /// Chooses between indented and compact output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the default document path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the default keyring description.
    #[must_use]
    pub fn default_keyring(&self) -> &str {
        &self.default_keyring
    }

    /// Returns `true` when output is indented.
    #[must_use]
    pub const fn pretty(&self) -> bool {
        self.pretty
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] when the path or keyring
    /// description is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidOptions("config path cannot be empty"));
        }
        if self.default_keyring.trim().is_empty() {
            return Err(ConfigError::InvalidOptions(
                "default keyring description cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            default_keyring: fabric_keyring::DEFAULT_KEYRING.to_owned(),
            pretty: true,
        }
    }
}
