use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use fabric_config::{
    ConfigError, ConfigOptions, Destination, FabricConfig, PSK_KEY_TYPE, psk_identity,
};
use fabric_keyring::{MemoryKeyring, SecretStore, TlsPsk};
use fabric_primitives::{NVME_DISC_SUBSYS_NAME, Nqn, Transport};
use fabric_topology::{ControllerKey, Root};
use serde_json::{Value, json};
use uuid::Uuid;

const HOSTNQN: &str = "nqn.2014-08.org.nvmexpress:uuid:7d1c0f52-0000-4000-8000-00000000c0de";
const HOSTID: &str = "7d1c0f52-0000-4000-8000-00000000c0de";
const SUBSYS_A: &str = "nqn.2019-10.com.example:array-a";
const SUBSYS_B: &str = "nqn.2019-10.com.example:array-b";
const SUBSYS_C: &str = "nqn.2019-10.com.example:array-c";

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("nvmf-config-{}.json", Uuid::new_v4()))
}

fn write_doc(value: &Value) -> PathBuf {
    let path = temp_path();
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

fn tcp_key() -> ControllerKey {
    ControllerKey::new(Transport::Tcp)
        .with_traddr("192.168.10.20")
        .with_trsvcid("4420")
}

fn psk(len: usize) -> String {
    TlsPsk::new(vec![0x3c; len]).unwrap().encode()
}

fn sample_document() -> Value {
    json!([
        {
            "hostnqn": HOSTNQN,
            "hostid": HOSTID,
            "hostsymname": "rack-7",
            "persistent_discovery_ctrl": false,
            "subsystems": [
                {
                    "nqn": SUBSYS_A,
                    "application": "db",
                    "ports": [
                        {
                            "transport": "tcp",
                            "traddr": "192.168.10.20",
                            "host_iface": "eth1",
                            "trsvcid": "4420",
                            "dhchap_key": "DHHC-1:00:c2VjcmV0LWtleS1tYXRlcmlhbC0wMTIzNDU2Nzg5Og==:",
                            "nr_io_queues": 8,
                            "queue_size": 128,
                            "ctrl_loss_tmo": 1800,
                            "tos": 0,
                            "hdr_digest": true,
                            "tls": true,
                            "keyring": ".nvme",
                            "tls_key": psk(48)
                        },
                        {
                            "transport": "rdma",
                            "traddr": "10.0.0.5",
                            "trsvcid": "4420",
                            "keep_alive_tmo": 30
                        }
                    ]
                }
            ]
        }
    ])
}

#[test]
fn round_trip_survives_fresh_topology_and_store() {
    let source = write_doc(&sample_document());
    let first = temp_path();
    let second = temp_path();

    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let mut root = Root::new();
    let summary = config.load(&mut root, &source).unwrap();
    assert_eq!(summary.hosts, 1);
    assert_eq!(summary.ports, 2);
    assert_eq!(summary.tls_keys, 1);
    config.store(&root, Destination::Path(&first)).unwrap();

    let other = FabricConfig::new(Arc::new(MemoryKeyring::with_first_serial(5000)));
    let mut fresh = Root::new();
    other.load(&mut fresh, &first).unwrap();
    other.store(&fresh, Destination::Path(&second)).unwrap();

    let stored: Value = serde_json::from_slice(&fs::read(&second).unwrap()).unwrap();
    assert_eq!(stored, sample_document());

    let ports = &stored[0]["subsystems"][0]["ports"][0];
    let keys: Vec<&str> = ports.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "transport", "traddr", "host_iface", "trsvcid", "dhchap_key", "nr_io_queues",
            "queue_size", "ctrl_loss_tmo", "tos", "hdr_digest", "tls", "keyring", "tls_key",
        ]
    );

    for path in [source, first, second] {
        fs::remove_file(path).ok();
    }
}

#[test]
fn live_values_win_over_document() {
    let mut root = Root::new();
    let ctrl = root
        .lookup_host(HOSTNQN, None)
        .unwrap()
        .lookup_subsystem(SUBSYS_A)
        .unwrap()
        .lookup_ctrl(tcp_key());
    ctrl.config_mut().queue_size = 64;

    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [{
            "nqn": SUBSYS_A,
            "ports": [{
                "transport": "tcp",
                "traddr": "192.168.10.20",
                "trsvcid": "4420",
                "queue_size": 128,
                "nr_io_queues": 4
            }]
        }]
    }]);
    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    config.import_tree(&mut root, &doc).unwrap();

    let ctrl = root.hosts()[0].subsystems()[0].find_ctrl(&tcp_key()).unwrap();
    assert_eq!(ctrl.config().queue_size, 64);
    assert_eq!(ctrl.config().nr_io_queues, 4);
    assert_eq!(root.hosts()[0].subsystems()[0].controllers().len(), 1);
}

#[test]
fn defaults_are_omitted_on_export() {
    let mut root = Root::new();
    let subsys = root
        .lookup_host(HOSTNQN, None)
        .unwrap()
        .lookup_subsystem(SUBSYS_A)
        .unwrap();
    subsys.lookup_ctrl(tcp_key());
    subsys
        .lookup_ctrl(ControllerKey::new(Transport::Rdma).with_traddr("10.0.0.5"))
        .config_mut()
        .tos = 0;

    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let tree = config.export_config(&root);
    let ports = tree[0]["subsystems"][0]["ports"].as_array().unwrap();
    assert_eq!(
        ports[0],
        json!({"transport": "tcp", "traddr": "192.168.10.20", "trsvcid": "4420"})
    );
    assert_eq!(ports[1]["tos"], json!(0));
    assert!(ports[1].get("ctrl_loss_tmo").is_none());
}

#[test]
fn discovery_and_pcie_are_not_persisted() {
    let mut root = Root::new();
    let host = root.lookup_host(HOSTNQN, None).unwrap();
    host.add_subsystem(NVME_DISC_SUBSYS_NAME)
        .unwrap()
        .lookup_ctrl(tcp_key())
        .set_discovery(true);
    host.lookup_subsystem(SUBSYS_A)
        .unwrap()
        .lookup_ctrl(ControllerKey::new(Transport::Pcie).with_traddr("0000:3b:00.0"));

    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    assert_eq!(config.export_config(&root), json!([]));

    let dump = config.export_tree(&root);
    let subsystems = dump["hosts"][0]["subsystems"].as_array().unwrap();
    assert_eq!(subsystems.len(), 2);
    assert_eq!(subsystems[0]["nqn"], json!(NVME_DISC_SUBSYS_NAME));
    assert_eq!(subsystems[1]["controllers"][0]["transport"], json!("pcie"));
}

#[test]
fn transport_limits_what_is_written() {
    let mut root = Root::new();
    let subsys = root
        .lookup_host(HOSTNQN, None)
        .unwrap()
        .lookup_subsystem(SUBSYS_A)
        .unwrap();
    let lo = subsys.lookup_ctrl(ControllerKey::new(Transport::Loop));
    lo.config_mut().ctrl_loss_tmo = 30;
    lo.config_mut().fast_io_fail_tmo = 5;
    lo.config_mut().queue_size = 32;
    let rdma = subsys.lookup_ctrl(ControllerKey::new(Transport::Rdma).with_traddr("10.0.0.5"));
    rdma.config_mut().tls = true;
    rdma.config_mut().ctrl_loss_tmo = 30;

    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let tree = config.export_config(&root);
    let ports = tree[0]["subsystems"][0]["ports"].as_array().unwrap();
    assert_eq!(ports[0], json!({"transport": "loop", "queue_size": 32}));
    assert_eq!(
        ports[1],
        json!({"transport": "rdma", "traddr": "10.0.0.5", "ctrl_loss_tmo": 30})
    );
}

#[test]
fn non_tcp_port_keeps_tls_material_out_of_both_outputs() {
    let store = Arc::new(MemoryKeyring::new());
    let ring = store.lookup_keyring(".nvme").unwrap();
    let serial = store.insert_key(ring, PSK_KEY_TYPE, "rdma-port", &[0x3c; 32]).unwrap();

    let mut root = Root::new();
    let rdma = root
        .lookup_host(HOSTNQN, None)
        .unwrap()
        .lookup_subsystem(SUBSYS_A)
        .unwrap()
        .lookup_ctrl(ControllerKey::new(Transport::Rdma).with_traddr("10.0.0.5"));
    let tunables = rdma.config_mut();
    tunables.tls = true;
    tunables.keyring = Some(ring);
    tunables.tls_key = Some(serial);

    let config = FabricConfig::new(store.clone());
    let port = &config.export_config(&root)[0]["subsystems"][0]["ports"][0];
    assert_eq!(port, &json!({"transport": "rdma", "traddr": "10.0.0.5"}));

    let dumped = &config.export_tree(&root)["hosts"][0]["subsystems"][0]["controllers"][0];
    for field in ["tls", "keyring", "tls_key"] {
        assert!(dumped.get(field).is_none(), "dump carries {field}");
    }
    assert_eq!(dumped["transport"], json!("rdma"));
}

#[test]
fn transport_limits_what_is_read() {
    let store = Arc::new(MemoryKeyring::new());
    let config = FabricConfig::new(store.clone());
    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [{
            "nqn": SUBSYS_A,
            "ports": [
                {"transport": "loop", "ctrl_loss_tmo": 30, "fast_io_fail_tmo": 5},
                {"transport": "rdma", "traddr": "10.0.0.5", "tls": true, "tls_key": psk(32)}
            ]
        }]
    }]);
    let mut root = Root::new();
    let summary = config.import_tree(&mut root, &doc).unwrap();
    assert_eq!(summary.tls_keys, 0);
    assert_eq!(store.key_count().unwrap(), 0);

    let ctrls = root.hosts()[0].subsystems()[0].controllers();
    assert_eq!(ctrls[0].config().ctrl_loss_tmo, 600);
    assert_eq!(ctrls[0].config().fast_io_fail_tmo, 0);
    assert!(!ctrls[1].config().tls);
    assert!(ctrls[1].config().tls_key.is_none());
}

#[test]
fn bad_subsystem_record_does_not_stop_the_rest() {
    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [
            {"nqn": SUBSYS_A, "ports": [{"transport": "tcp", "traddr": "192.168.10.20"}]},
            {"ports": [{"transport": "tcp", "traddr": "192.168.10.21"}]},
            {"nqn": SUBSYS_C, "ports": [{"transport": "tcp", "traddr": "192.168.10.22"}]}
        ]
    }]);
    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let mut root = Root::new();
    let summary = config.import_tree(&mut root, &doc).unwrap();

    assert_eq!(summary.subsystems, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.ports, 2);
    let nqns: Vec<&str> = root.hosts()[0]
        .subsystems()
        .iter()
        .map(|s| s.nqn().as_str())
        .collect();
    assert_eq!(nqns, [SUBSYS_A, SUBSYS_C]);
}

#[test]
fn tls_key_ahead_of_keyring_uses_named_keyring() {
    let store = Arc::new(MemoryKeyring::new());
    let ring = store.create_keyring("nvme-tls").unwrap();
    let config = FabricConfig::new(store.clone());
    let encoded = psk(32);
    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [{
            "nqn": SUBSYS_B,
            "ports": [{
                "transport": "tcp",
                "traddr": "192.168.10.20",
                "trsvcid": "4420",
                "tls_key": encoded,
                "keyring": "nvme-tls"
            }]
        }]
    }]);
    let mut root = Root::new();
    config.import_tree(&mut root, &doc).unwrap();

    let ctrl = root.hosts()[0].subsystems()[0].find_ctrl(&tcp_key()).unwrap();
    assert_eq!(ctrl.config().keyring, Some(ring));
    assert!(ctrl.config().tls);
    let identity = psk_identity(
        1,
        &Nqn::new(HOSTNQN).unwrap(),
        &Nqn::new(SUBSYS_B).unwrap(),
    );
    let serial = store.search_key(PSK_KEY_TYPE, &identity).unwrap();
    assert_eq!(ctrl.config().tls_key, serial);
    assert_eq!(
        store.read_key(Some(ring), serial.unwrap()).unwrap().as_ref(),
        &[0x3c; 32]
    );

    let port = &config.export_config(&root)[0]["subsystems"][0]["ports"][0];
    assert_eq!(port["keyring"], json!("nvme-tls"));
    assert_eq!(port["tls_key"], json!(encoded));
}

#[test]
fn unknown_keyring_leaves_key_unset() {
    let store = Arc::new(MemoryKeyring::new());
    let config = FabricConfig::new(store.clone());
    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [{
            "nqn": SUBSYS_B,
            "ports": [{"transport": "tcp", "traddr": "192.168.10.20", "keyring": "absent", "tls_key": psk(32)}]
        }]
    }]);
    let mut root = Root::new();
    config.import_tree(&mut root, &doc).unwrap();

    let ctrl = &root.hosts()[0].subsystems()[0].controllers()[0];
    assert!(ctrl.config().keyring.is_none());
    assert!(ctrl.config().tls_key.is_none());
    assert_eq!(store.key_count().unwrap(), 0);
}

#[test]
fn malformed_key_leaves_rest_of_port() {
    let store = Arc::new(MemoryKeyring::new());
    let config = FabricConfig::new(store.clone());
    let doc = json!([{
        "hostnqn": HOSTNQN,
        "subsystems": [{
            "nqn": SUBSYS_B,
            "ports": [{"transport": "tcp", "traddr": "192.168.10.20", "tls_key": "NVMeTLSkey-1:03:AAAA:", "queue_size": 256}]
        }]
    }]);
    let mut root = Root::new();
    config.import_tree(&mut root, &doc).unwrap();

    let ctrl = &root.hosts()[0].subsystems()[0].controllers()[0];
    assert_eq!(ctrl.config().queue_size, 256);
    assert!(ctrl.config().tls_key.is_none());
    assert_eq!(store.key_count().unwrap(), 0);
}

#[test]
fn unusable_documents_leave_topology_untouched() {
    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let mut root = Root::new();

    let missing = config.load(&mut root, temp_path()).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
    assert!(!missing.is_protocol_error());

    let malformed = temp_path();
    fs::write(&malformed, b"[{\"hostnqn\": ").unwrap();
    let err = config.load(&mut root, &malformed).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.is_protocol_error());

    let object = write_doc(&json!({"hostnqn": HOSTNQN}));
    let err = config.load(&mut root, &object).unwrap_err();
    assert!(matches!(err, ConfigError::Format(_)));
    assert!(err.is_protocol_error());

    assert!(root.is_empty());
    for path in [malformed, object] {
        fs::remove_file(path).ok();
    }
}

#[test]
fn dump_names_every_node() {
    let mut root = Root::new();
    let host = root.lookup_host(HOSTNQN, Some(HOSTID)).unwrap();
    host.set_hostsymname("rack-7");
    let subsys = host.lookup_subsystem(SUBSYS_A).unwrap();
    subsys.lookup_ctrl(tcp_key());
    subsys
        .lookup_ctrl(ControllerKey::new(Transport::Pcie).with_traddr("0000:3b:00.0"))
        .set_name("nvme4");
    host.lookup_subsystem(SUBSYS_B).unwrap().set_name("nvme-subsys9");

    let config = FabricConfig::new(Arc::new(MemoryKeyring::new()));
    let mut out = Vec::new();
    config.dump(&root, &mut out).unwrap();
    let dump: Value = serde_json::from_slice(&out).unwrap();

    let host = &dump["hosts"][0];
    assert_eq!(host["hostid"], json!(HOSTID));
    assert_eq!(host["hostsymname"], json!("rack-7"));
    let subsystems = host["subsystems"].as_array().unwrap();
    assert_eq!(subsystems[0]["name"], json!("nvme-subsys0"));
    assert_eq!(subsystems[0]["controllers"][0]["name"], json!("nvme0"));
    assert_eq!(subsystems[0]["controllers"][1]["name"], json!("nvme4"));
    assert_eq!(subsystems[1]["name"], json!("nvme-subsys9"));
    assert!(subsystems[1].get("controllers").is_none());
}

#[test]
fn default_path_comes_from_options() {
    let path = temp_path();
    let options = ConfigOptions::new().with_config_path(&path).with_pretty(false);
    let config = FabricConfig::with_options(Arc::new(MemoryKeyring::new()), options).unwrap();

    let mut root = Root::new();
    root.lookup_host(HOSTNQN, None)
        .unwrap()
        .lookup_subsystem(SUBSYS_A)
        .unwrap()
        .lookup_ctrl(tcp_key());
    config.store_default(&root).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains('\n'));

    let mut reloaded = Root::new();
    let summary = config.load_default(&mut reloaded).unwrap();
    assert_eq!(summary.ports, 1);
    fs::remove_file(path).ok();
}

#[test]
fn secret_store_is_shared() {
    let store = Arc::new(MemoryKeyring::new());
    let config = FabricConfig::new(store.clone());
    let ring = config.secret_store().lookup_keyring(".nvme").unwrap();
    assert_eq!(store.lookup_keyring(".nvme").unwrap(), ring);
}
