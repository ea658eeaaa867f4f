//! Declarative attribute tables.
//!
//! Each [`FieldPolicy`] names a document key, how to read and write the
//! matching node attribute, the value meaning "not configured", and which
//! transports the attribute applies to. Import fills an attribute only while
//! it still holds that value; export omits it while it does.

use fabric_primitives::Transport;
use fabric_topology::{Controller, Host, NVMF_DEF_CTRL_LOSS_TMO, Subsystem};
use serde_json::{Map, Value};
use tracing::debug;

/// Transports an attribute is meaningful for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportScope {
    /// Every node.
    Any,
    /// Every transport except the loopback target.
    NotLoop,
    /// Only NVMe/TCP.
    TcpOnly,
}

impl TransportScope {
    /// Returns `true` if a node reached over `transport` carries the attribute.
    /// Nodes without a transport only carry [`TransportScope::Any`] attributes.
    #[must_use]
    pub fn admits(self, transport: Option<&Transport>) -> bool {
        match (self, transport) {
            (Self::Any, _) => true,
            (Self::NotLoop, Some(t)) => *t != Transport::Loop,
            (Self::TcpOnly, Some(t)) => t.supports_tls(),
            (_, None) => false,
        }
    }
}

/// Typed accessor pair for a node attribute.
pub enum Accessor<N> {
    /// Integer with an explicit sentinel.
    Int {
        /// Reads the attribute.
        get: fn(&N) -> i32,
        /// Writes the attribute.
        set: fn(&mut N, i32),
        /// Value meaning "not configured".
        unset: i32,
    },
    /// Boolean whose sentinel is `false`.
    Flag {
        /// Reads the attribute.
        get: fn(&N) -> bool,
        /// Writes the attribute.
        set: fn(&mut N, bool),
    },
    /// Optional string whose sentinel is `None`.
    Text {
        /// Reads the attribute.
        get: fn(&N) -> Option<&str>,
        /// Writes the attribute.
        set: fn(&mut N, String),
    },
    /// Tri-state boolean whose sentinel is `None`; `Some(false)` is emitted.
    Toggle {
        /// Reads the attribute.
        get: fn(&N) -> Option<bool>,
        /// Writes the attribute.
        set: fn(&mut N, bool),
    },
}

/// Descriptor for one document key.
pub struct FieldPolicy<N> {
    /// Document key.
    pub name: &'static str,
    /// Transports the key applies to.
    pub scope: TransportScope,
    /// Attribute accessors and sentinel.
    pub accessor: Accessor<N>,
}

/// Outcome of offering a document value to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    /// The attribute was unset and now holds the document value.
    Applied,
    /// The attribute was already configured; the live value was kept.
    Kept,
    /// The attribute does not apply to this node's transport.
    OutOfScope,
    /// The document value has the wrong JSON type.
    Invalid,
}

/// Nodes the policy tables operate on.
pub trait PolicyTarget {
    /// Transport of the node, if it has one.
    fn transport(&self) -> Option<&Transport>;
}

impl PolicyTarget for Host {
    fn transport(&self) -> Option<&Transport> {
        None
    }
}

impl PolicyTarget for Subsystem {
    fn transport(&self) -> Option<&Transport> {
        None
    }
}

impl PolicyTarget for Controller {
    fn transport(&self) -> Option<&Transport> {
        Some(Controller::transport(self))
    }
}

impl<N: PolicyTarget> FieldPolicy<N> {
    /// Offers a document value to `node`, writing it only if the attribute
    /// still holds its sentinel.
    pub fn import(&self, node: &mut N, value: &Value) -> FieldUpdate {
        if !self.scope.admits(node.transport()) {
            return FieldUpdate::OutOfScope;
        }
        let update = match &self.accessor {
            Accessor::Int { get, set, unset } => {
                match value.as_i64().and_then(|v| i32::try_from(v).ok()) {
                    None => FieldUpdate::Invalid,
                    Some(_) if get(node) != *unset => FieldUpdate::Kept,
                    Some(v) => {
                        set(node, v);
                        FieldUpdate::Applied
                    }
                }
            }
            Accessor::Flag { get, set } => match value.as_bool() {
                None => FieldUpdate::Invalid,
                Some(_) if get(node) => FieldUpdate::Kept,
                Some(v) => {
                    set(node, v);
                    FieldUpdate::Applied
                }
            },
            Accessor::Text { get, set } => match value.as_str() {
                None => FieldUpdate::Invalid,
                Some(_) if get(node).is_some() => FieldUpdate::Kept,
                Some(v) => {
                    set(node, v.to_owned());
                    FieldUpdate::Applied
                }
            },
            Accessor::Toggle { get, set } => match value.as_bool() {
                None => FieldUpdate::Invalid,
                Some(_) if get(node).is_some() => FieldUpdate::Kept,
                Some(v) => {
                    set(node, v);
                    FieldUpdate::Applied
                }
            },
        };
        if update == FieldUpdate::Invalid {
            debug!(field = self.name, value = %value, "ignoring attribute with unexpected type");
        }
        update
    }

    /// Inserts the attribute into `obj` unless it holds its sentinel or does
    /// not apply to the node's transport.
    pub fn export(&self, node: &N, obj: &mut Map<String, Value>) {
        if !self.scope.admits(node.transport()) {
            return;
        }
        let value = match &self.accessor {
            Accessor::Int { get, unset, .. } => {
                let v = get(node);
                (v != *unset).then(|| Value::from(v))
            }
            Accessor::Flag { get, .. } => get(node).then_some(Value::Bool(true)),
            Accessor::Text { get, .. } => get(node).map(Value::from),
            Accessor::Toggle { get, .. } => get(node).map(Value::Bool),
        };
        if let Some(value) = value {
            obj.insert(self.name.to_owned(), value);
        }
    }
}

/// Looks up the descriptor for `name` in `table`.
#[must_use]
pub fn find<N>(table: &'static [FieldPolicy<N>], name: &str) -> Option<&'static FieldPolicy<N>> {
    table.iter().find(|policy| policy.name == name)
}

/// Emits every non-default attribute of `node` in table order.
pub fn export_all<N: PolicyTarget>(table: &[FieldPolicy<N>], node: &N, obj: &mut Map<String, Value>) {
    for policy in table {
        policy.export(node, obj);
    }
}

macro_rules! int_field {
    ($name:ident, $unset:expr, $scope:expr) => {
        FieldPolicy {
            name: stringify!($name),
            scope: $scope,
            accessor: Accessor::Int {
                get: |c: &Controller| c.config().$name,
                set: |c: &mut Controller, v: i32| c.config_mut().$name = v,
                unset: $unset,
            },
        }
    };
}

macro_rules! flag_field {
    ($name:ident, $scope:expr) => {
        FieldPolicy {
            name: stringify!($name),
            scope: $scope,
            accessor: Accessor::Flag {
                get: |c: &Controller| c.config().$name,
                set: |c: &mut Controller, v: bool| c.config_mut().$name = v,
            },
        }
    };
}

/// Host attributes other than the identity (`hostnqn`, `hostid`).
pub static HOST_FIELDS: &[FieldPolicy<Host>] = &[
    FieldPolicy {
        name: "dhchap_key",
        scope: TransportScope::Any,
        accessor: Accessor::Text {
            get: Host::dhchap_key,
            set: |h: &mut Host, v: String| h.set_dhchap_key(v),
        },
    },
    FieldPolicy {
        name: "hostsymname",
        scope: TransportScope::Any,
        accessor: Accessor::Text {
            get: Host::hostsymname,
            set: |h: &mut Host, v: String| h.set_hostsymname(v),
        },
    },
    FieldPolicy {
        name: "persistent_discovery_ctrl",
        scope: TransportScope::Any,
        accessor: Accessor::Toggle {
            get: Host::pdc_enabled,
            set: Host::set_pdc_enabled,
        },
    },
];

/// Subsystem attributes other than the identity (`nqn`).
pub static SUBSYSTEM_FIELDS: &[FieldPolicy<Subsystem>] = &[FieldPolicy {
    name: "application",
    scope: TransportScope::Any,
    accessor: Accessor::Text {
        get: Subsystem::application,
        set: |s: &mut Subsystem, v: String| s.set_application(v),
    },
}];

/// Controller attributes other than the addressing key and the TLS key
/// material, in document order.
pub static CONTROLLER_FIELDS: &[FieldPolicy<Controller>] = &[
    FieldPolicy {
        name: "dhchap_key",
        scope: TransportScope::Any,
        accessor: Accessor::Text {
            get: Controller::dhchap_host_key,
            set: |c: &mut Controller, v: String| c.set_dhchap_host_key(v),
        },
    },
    FieldPolicy {
        name: "dhchap_ctrl_key",
        scope: TransportScope::Any,
        accessor: Accessor::Text {
            get: Controller::dhchap_ctrl_key,
            set: |c: &mut Controller, v: String| c.set_dhchap_ctrl_key(v),
        },
    },
    int_field!(nr_io_queues, 0, TransportScope::Any),
    int_field!(nr_write_queues, 0, TransportScope::Any),
    int_field!(nr_poll_queues, 0, TransportScope::Any),
    int_field!(queue_size, 0, TransportScope::Any),
    int_field!(keep_alive_tmo, 0, TransportScope::Any),
    int_field!(reconnect_delay, 0, TransportScope::Any),
    int_field!(ctrl_loss_tmo, NVMF_DEF_CTRL_LOSS_TMO, TransportScope::NotLoop),
    int_field!(fast_io_fail_tmo, 0, TransportScope::NotLoop),
    int_field!(tos, -1, TransportScope::Any),
    flag_field!(duplicate_connect, TransportScope::Any),
    flag_field!(disable_sqflow, TransportScope::Any),
    flag_field!(hdr_digest, TransportScope::Any),
    flag_field!(data_digest, TransportScope::Any),
    flag_field!(tls, TransportScope::TcpOnly),
    flag_field!(concat, TransportScope::Any),
    FieldPolicy {
        name: "persistent",
        scope: TransportScope::Any,
        accessor: Accessor::Flag {
            get: Controller::is_persistent,
            set: Controller::set_persistent,
        },
    },
    FieldPolicy {
        name: "discovery",
        scope: TransportScope::Any,
        accessor: Accessor::Flag {
            get: Controller::is_discovery,
            set: Controller::set_discovery,
        },
    },
];

/// Scope of the `keyring` and `tls_key` keys handled by the PSK bridge.
pub const TLS_KEY_SCOPE: TransportScope = TransportScope::TcpOnly;
