//! Merging a configuration document into a live topology.

use fabric_keyring::SecretStore;
use fabric_primitives::{Nqn, Transport};
use fabric_topology::{Controller, ControllerKey, Host, Root, Subsystem};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::policy::{
    self, CONTROLLER_FIELDS, FieldPolicy, HOST_FIELDS, PolicyTarget, SUBSYSTEM_FIELDS,
    TLS_KEY_SCOPE,
};
use crate::{ConfigError, ConfigResult, bridge};

/// Counts of what an import pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Host records resolved to a topology node.
    pub hosts: usize,
    /// Subsystem records resolved to a topology node.
    pub subsystems: usize,
    /// Port records resolved to a controller.
    pub ports: usize,
    /// Records skipped for a missing or unresolvable identity.
    pub skipped: usize,
    /// TLS keys inserted into the secret store.
    pub tls_keys: usize,
}

/// Keys of a port record whose handling depends on other keys of the same
/// record, collected while scanning and applied afterwards.
#[derive(Debug, Default)]
struct DeferredSecrets<'a> {
    keyring: Option<&'a str>,
    tls_key: Option<&'a str>,
}

/// Walks a parsed document and fills unset attributes of the topology.
pub struct Importer<'a> {
    store: &'a dyn SecretStore,
    default_keyring: &'a str,
    summary: ImportSummary,
}

impl<'a> Importer<'a> {
    /// Creates an importer inserting TLS keys into `store`; keys without a
    /// keyring go to the keyring described by `default_keyring`.
    #[must_use]
    pub fn new(store: &'a dyn SecretStore, default_keyring: &'a str) -> Self {
        Self {
            store,
            default_keyring,
            summary: ImportSummary::default(),
        }
    }

    /// Imports every host record of `tree` into `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Format`] without touching `root` when the top
    /// level is not an array. Problems inside records are logged and skipped.
    pub fn import(mut self, root: &mut Root, tree: &Value) -> ConfigResult<ImportSummary> {
        let Some(hosts) = tree.as_array() else {
            debug!("wrong format, expected array");
            return Err(ConfigError::Format("expected an array of host records"));
        };
        for host in hosts {
            self.import_host(root, host);
        }
        info!(
            hosts = self.summary.hosts,
            subsystems = self.summary.subsystems,
            ports = self.summary.ports,
            skipped = self.summary.skipped,
            "imported fabrics configuration"
        );
        Ok(self.summary)
    }

    fn skip(&mut self, record: &'static str, reason: &str) {
        debug!(record, reason, "skipping record");
        self.summary.skipped += 1;
    }

    fn import_host(&mut self, root: &mut Root, record: &Value) {
        let Some(obj) = record.as_object() else {
            return self.skip("host", "record is not an object");
        };
        let Some(hostnqn) = obj.get("hostnqn").and_then(Value::as_str) else {
            return self.skip("host", "missing hostnqn");
        };
        let hostid = optional_str(obj, "hostid");
        let host = match root.lookup_host(hostnqn, hostid) {
            Ok(host) => host,
            Err(err) => return self.skip("host", &err.to_string()),
        };
        self.summary.hosts += 1;

        apply_fields(HOST_FIELDS, host, obj, &["hostnqn", "hostid", "subsystems"]);

        let hostnqn = host.hostnqn().clone();
        for subsys in records(obj, "subsystems") {
            self.import_subsystem(host, &hostnqn, subsys);
        }
    }

    fn import_subsystem(&mut self, host: &mut Host, hostnqn: &Nqn, record: &Value) {
        let Some(obj) = record.as_object() else {
            return self.skip("subsystem", "record is not an object");
        };
        let Some(nqn) = obj.get("nqn").and_then(Value::as_str) else {
            return self.skip("subsystem", "missing nqn");
        };
        let subsys = match host.lookup_subsystem(nqn) {
            Ok(subsys) => subsys,
            Err(err) => return self.skip("subsystem", &err.to_string()),
        };
        self.summary.subsystems += 1;

        apply_fields(SUBSYSTEM_FIELDS, subsys, obj, &["nqn", "ports"]);

        for port in records(obj, "ports") {
            self.import_port(subsys, hostnqn, port);
        }
    }

    fn import_port(&mut self, subsys: &mut Subsystem, hostnqn: &Nqn, record: &Value) {
        let Some(obj) = record.as_object() else {
            return self.skip("port", "record is not an object");
        };
        let Some(transport) = obj.get("transport").and_then(Value::as_str) else {
            return self.skip("port", "missing transport");
        };
        let transport = match transport.parse::<Transport>() {
            Ok(transport) => transport,
            Err(err) => return self.skip("port", &err.to_string()),
        };
        let mut key = ControllerKey::new(transport);
        if let Some(traddr) = optional_str(obj, "traddr") {
            key = key.with_traddr(traddr);
        }
        if let Some(host_traddr) = optional_str(obj, "host_traddr") {
            key = key.with_host_traddr(host_traddr);
        }
        if let Some(host_iface) = optional_str(obj, "host_iface") {
            key = key.with_host_iface(host_iface);
        }
        if let Some(trsvcid) = optional_str(obj, "trsvcid") {
            key = key.with_trsvcid(trsvcid);
        }
        let subsysnqn = subsys.nqn().clone();
        let ctrl = subsys.lookup_ctrl(key);
        self.summary.ports += 1;

        let mut deferred = DeferredSecrets::default();
        for (name, value) in obj {
            match name.as_str() {
                "transport" | "traddr" | "host_traddr" | "host_iface" | "trsvcid" => {}
                "keyring" | "tls_key" if !TLS_KEY_SCOPE.admits(Some(ctrl.transport())) => {
                    debug!(field = %name, transport = %ctrl.transport(), "ignoring TLS attribute");
                }
                "keyring" => deferred.keyring = as_text(name, value),
                "tls_key" => deferred.tls_key = as_text(name, value),
                other => offer(CONTROLLER_FIELDS, ctrl, other, value),
            }
        }
        self.apply_secrets(ctrl, hostnqn, &subsysnqn, &deferred);
    }

    fn apply_secrets(
        &mut self,
        ctrl: &mut Controller,
        hostnqn: &Nqn,
        subsysnqn: &Nqn,
        deferred: &DeferredSecrets<'_>,
    ) {
        if let Some(description) = deferred.keyring {
            if ctrl.config().keyring.is_none() {
                ctrl.config_mut().keyring = bridge::resolve_keyring(self.store, description);
            }
        }

        let Some(encoded) = deferred.tls_key else {
            return;
        };
        if ctrl.config().tls_key.is_some() {
            debug!(%subsysnqn, "TLS key already configured, keeping it");
            return;
        }
        let keyring = match (ctrl.config().keyring, deferred.keyring) {
            (Some(keyring), _) => keyring,
            (None, Some(description)) => {
                warn!(keyring = description, %subsysnqn, "keyring unresolved, not importing TLS key");
                return;
            }
            (None, None) => match bridge::resolve_keyring(self.store, self.default_keyring) {
                Some(keyring) => keyring,
                None => return,
            },
        };
        if let Some(serial) = bridge::import_tls_key(self.store, keyring, hostnqn, subsysnqn, encoded) {
            let config = ctrl.config_mut();
            config.tls_key = Some(serial);
            config.tls = true;
            self.summary.tls_keys += 1;
        }
    }
}

/// Offers every key of `obj` except `identity` to the matching descriptor.
fn apply_fields<N: PolicyTarget>(
    table: &'static [FieldPolicy<N>],
    node: &mut N,
    obj: &Map<String, Value>,
    identity: &[&str],
) {
    for (name, value) in obj {
        if !identity.contains(&name.as_str()) {
            offer(table, node, name, value);
        }
    }
}

fn offer<N: PolicyTarget>(table: &'static [FieldPolicy<N>], node: &mut N, name: &str, value: &Value) {
    match policy::find(table, name) {
        Some(field) => {
            field.import(node, value);
        }
        None => debug!(field = name, "ignoring unknown attribute"),
    }
}

fn optional_str<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v str> {
    obj.get(name).and_then(|value| as_text(name, value))
}

fn as_text<'v>(name: &str, value: &'v Value) -> Option<&'v str> {
    let text = value.as_str();
    if text.is_none() && !value.is_null() {
        debug!(field = name, "ignoring non-string attribute");
    }
    text
}

fn records<'v>(obj: &'v Map<String, Value>, name: &str) -> impl Iterator<Item = &'v Value> {
    obj.get(name)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
