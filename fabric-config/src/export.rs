//! Rendering a live topology as a document.

use fabric_keyring::SecretStore;
use fabric_primitives::Transport;
use fabric_topology::{Controller, Host, Root, Subsystem};
use serde_json::{Map, Value};

use crate::bridge;
use crate::policy::{self, CONTROLLER_FIELDS, HOST_FIELDS, SUBSYSTEM_FIELDS, TLS_KEY_SCOPE};

/// Builds the configuration document for `root`.
///
/// Discovery subsystems and PCIe controllers are left out; subsystems and
/// hosts left without ports are dropped.
#[must_use]
pub fn export_config(root: &Root, store: &dyn SecretStore) -> Value {
    let hosts = root
        .hosts()
        .iter()
        .filter_map(|host| {
            let subsystems: Vec<Value> = host
                .subsystems()
                .iter()
                .filter(|subsys| !subsys.is_discovery())
                .filter_map(|subsys| config_subsystem(subsys, store))
                .collect();
            if subsystems.is_empty() {
                return None;
            }
            let mut obj = host_object(host);
            obj.insert("subsystems".to_owned(), Value::Array(subsystems));
            Some(Value::Object(obj))
        })
        .collect();
    Value::Array(hosts)
}

/// Builds a diagnostic snapshot of every host, subsystem, and controller.
///
/// Nodes without a runtime-assigned name get a generated one. The result is
/// not meant to be imported again.
#[must_use]
pub fn export_tree(root: &Root, store: &dyn SecretStore) -> Value {
    let mut names = DisplayNames::default();
    let hosts = root
        .hosts()
        .iter()
        .map(|host| {
            let mut obj = host_object(host);
            let subsystems: Vec<Value> = host
                .subsystems()
                .iter()
                .map(|subsys| dump_subsystem(subsys, store, &mut names))
                .collect();
            if !subsystems.is_empty() {
                obj.insert("subsystems".to_owned(), Value::Array(subsystems));
            }
            Value::Object(obj)
        })
        .collect();

    let mut root_obj = Map::new();
    root_obj.insert("hosts".to_owned(), Value::Array(hosts));
    Value::Object(root_obj)
}

#[derive(Debug, Default)]
struct DisplayNames {
    subsystems: usize,
    controllers: usize,
}

impl DisplayNames {
    fn subsystem(&mut self, subsys: &Subsystem) -> String {
        let index = self.subsystems;
        self.subsystems += 1;
        subsys
            .name()
            .map_or_else(|| format!("nvme-subsys{index}"), str::to_owned)
    }

    fn controller(&mut self, ctrl: &Controller) -> String {
        let index = self.controllers;
        self.controllers += 1;
        ctrl.name()
            .map_or_else(|| format!("nvme{index}"), str::to_owned)
    }
}

fn host_object(host: &Host) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("hostnqn".to_owned(), Value::from(host.hostnqn().as_str()));
    if let Some(hostid) = host.hostid() {
        obj.insert("hostid".to_owned(), Value::from(hostid.as_str()));
    }
    policy::export_all(HOST_FIELDS, host, &mut obj);
    obj
}

fn config_subsystem(subsys: &Subsystem, store: &dyn SecretStore) -> Option<Value> {
    let ports: Vec<Value> = subsys
        .controllers()
        .iter()
        .filter(|ctrl| *ctrl.transport() != Transport::Pcie)
        .map(|ctrl| Value::Object(controller_object(ctrl, store, Map::new())))
        .collect();
    if ports.is_empty() {
        return None;
    }
    let mut obj = Map::new();
    obj.insert("nqn".to_owned(), Value::from(subsys.nqn().as_str()));
    policy::export_all(SUBSYSTEM_FIELDS, subsys, &mut obj);
    obj.insert("ports".to_owned(), Value::Array(ports));
    Some(Value::Object(obj))
}

fn dump_subsystem(subsys: &Subsystem, store: &dyn SecretStore, names: &mut DisplayNames) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_owned(), Value::from(names.subsystem(subsys)));
    obj.insert("nqn".to_owned(), Value::from(subsys.nqn().as_str()));
    policy::export_all(SUBSYSTEM_FIELDS, subsys, &mut obj);
    let controllers: Vec<Value> = subsys
        .controllers()
        .iter()
        .map(|ctrl| {
            let mut prefix = Map::new();
            prefix.insert("name".to_owned(), Value::from(names.controller(ctrl)));
            Value::Object(controller_object(ctrl, store, prefix))
        })
        .collect();
    if !controllers.is_empty() {
        obj.insert("controllers".to_owned(), Value::Array(controllers));
    }
    Value::Object(obj)
}

/// Appends the addressing key, the policy table, and the TLS key material
/// of `ctrl` to `obj`.
fn controller_object(
    ctrl: &Controller,
    store: &dyn SecretStore,
    mut obj: Map<String, Value>,
) -> Map<String, Value> {
    let key = ctrl.key();
    obj.insert("transport".to_owned(), Value::from(key.transport().as_str()));
    let addressing = [
        ("traddr", key.traddr()),
        ("host_traddr", key.host_traddr()),
        ("host_iface", key.host_iface()),
        ("trsvcid", key.trsvcid()),
    ];
    for (name, value) in addressing {
        if let Some(value) = value {
            obj.insert(name.to_owned(), Value::from(value));
        }
    }

    policy::export_all(CONTROLLER_FIELDS, ctrl, &mut obj);

    if TLS_KEY_SCOPE.admits(Some(ctrl.transport())) {
        let config = ctrl.config();
        if let Some(description) = config.keyring.and_then(|k| bridge::describe_keyring(store, k)) {
            obj.insert("keyring".to_owned(), Value::from(description));
        }
        if let Some(encoded) = config
            .tls_key
            .and_then(|key| bridge::export_tls_key(store, config.keyring, key))
        {
            obj.insert("tls_key".to_owned(), Value::from(encoded));
        }
    }
    obj
}
