//! JSON persistence for NVMe over Fabrics topologies.
//!
//! [`FabricConfig`] loads a configuration document into a live
//! [`Root`](fabric_topology::Root), stores the topology back as a document,
//! and dumps a diagnostic snapshot. Loading only fills attributes that are
//! still unset; storing omits attributes equal to their defaults. TLS keys
//! travel in interchange format and are bridged into a [`SecretStore`].

#![warn(missing_docs, clippy::pedantic)]

mod bridge;
mod codec;
mod document;
mod error;
mod export;
mod import;
mod options;
mod policy;

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use fabric_keyring::SecretStore;
use fabric_topology::Root;
use serde_json::Value;
use tracing::debug;

pub use bridge::{PSK_KEY_TYPE, psk_identity};
pub use document::Destination;
pub use error::{ConfigError, ConfigResult};
pub use export::{export_config, export_tree};
pub use import::{ImportSummary, Importer};
pub use options::{ConfigOptions, DEFAULT_CONFIG_PATH};

/// Loads, stores, and dumps fabrics configuration against one secret store.
#[derive(Clone)]
pub struct FabricConfig {
    store: Arc<dyn SecretStore>,
    options: ConfigOptions,
}

impl fmt::Debug for FabricConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FabricConfig")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FabricConfig {
    /// Creates a handle with default options.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            options: ConfigOptions::default(),
        }
    }

    /// Creates a handle with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] when the options fail validation.
    pub fn with_options(store: Arc<dyn SecretStore>, options: ConfigOptions) -> ConfigResult<Self> {
        options.validate()?;
        Ok(Self { store, options })
    }

    /// Returns the active options.
    #[must_use]
    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Returns the secret store TLS keys are bridged into.
    #[must_use]
    pub fn secret_store(&self) -> &dyn SecretStore {
        self.store.as_ref()
    }

    /// Reads the document at `path` and merges it into `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, and
    /// [`ConfigError::Parse`] or [`ConfigError::Format`] when its content is
    /// unusable. `root` is untouched in all three cases.
    pub fn load(&self, root: &mut Root, path: impl AsRef<Path>) -> ConfigResult<ImportSummary> {
        let path = path.as_ref();
        let bytes = document::read_document(path)?;
        let tree = codec::parse(&bytes).inspect_err(|err| {
            debug!(path = %path.display(), error = %err, "cannot parse configuration");
        })?;
        self.import_tree(root, &tree)
    }

    /// Loads from the configured default path.
    ///
    /// # Errors
    ///
    /// See [`FabricConfig::load`].
    pub fn load_default(&self, root: &mut Root) -> ConfigResult<ImportSummary> {
        self.load(root, self.options.config_path())
    }

    /// Merges an already parsed document into `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Format`] when `tree` is not an array.
    pub fn import_tree(&self, root: &mut Root, tree: &Value) -> ConfigResult<ImportSummary> {
        Importer::new(self.store.as_ref(), self.options.default_keyring()).import(root, tree)
    }

    /// Renders `root` as a configuration document.
    #[must_use]
    pub fn export_config(&self, root: &Root) -> Value {
        export_config(root, self.store.as_ref())
    }

    /// Renders the diagnostic snapshot of `root`.
    #[must_use]
    pub fn export_tree(&self, root: &Root) -> Value {
        export_tree(root, self.store.as_ref())
    }

    /// Writes the configuration document for `root` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the destination cannot be written.
    pub fn store(&self, root: &Root, destination: Destination<'_>) -> ConfigResult<()> {
        let tree = self.export_config(root);
        debug!(?destination, "storing fabrics configuration");
        document::write_document(&tree, destination, self.options.pretty())
    }

    /// Stores to the configured default path.
    ///
    /// # Errors
    ///
    /// See [`FabricConfig::store`].
    pub fn store_default(&self, root: &Root) -> ConfigResult<()> {
        self.store(root, Destination::Path(self.options.config_path()))
    }

    /// Writes the diagnostic snapshot of `root` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when `writer` fails.
    pub fn dump<W: Write>(&self, root: &Root, writer: &mut W) -> ConfigResult<()> {
        let tree = self.export_tree(root);
        codec::write(&tree, &mut *writer, self.options.pretty())?;
        writer.flush()?;
        Ok(())
    }
}
