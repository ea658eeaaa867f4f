//! Per-controller fabrics connection tunables.

use fabric_primitives::{KeySerial, KeyringId};

/// Default controller loss timeout in seconds.
pub const NVMF_DEF_CTRL_LOSS_TMO: i32 = 600;

/// Connection tunables attached to a controller.
///
/// Every field starts at its "not configured" value: `0` for counts and
/// timeouts, [`NVMF_DEF_CTRL_LOSS_TMO`] for `ctrl_loss_tmo`, `-1` for `tos`,
/// `false` for flags and `None` for secret handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricsConfig {
    /// Number of I/O queues.
    pub nr_io_queues: i32,
    /// Number of dedicated write queues.
    pub nr_write_queues: i32,
    /// Number of polling queues.
    pub nr_poll_queues: i32,
    /// I/O queue depth.
    pub queue_size: i32,
    /// Keep-alive timeout in seconds.
    pub keep_alive_tmo: i32,
    /// Delay between reconnect attempts in seconds.
    pub reconnect_delay: i32,
    /// Time before a lost controller is removed, in seconds.
    pub ctrl_loss_tmo: i32,
    /// Time before I/O fails fast on a lost controller, in seconds.
    pub fast_io_fail_tmo: i32,
    /// IP type of service.
    pub tos: i32,
    /// Allow duplicate connections to the same subsystem.
    pub duplicate_connect: bool,
    /// Disable submission queue flow control.
    pub disable_sqflow: bool,
    /// Enable header digests.
    pub hdr_digest: bool,
    /// Enable data digests.
    pub data_digest: bool,
    /// Enable TLS.
    pub tls: bool,
    /// Enable secure channel concatenation.
    pub concat: bool,
    /// Keyring holding the TLS key.
    pub keyring: Option<KeyringId>,
    /// TLS pre-shared key held in [`FabricsConfig::keyring`].
    pub tls_key: Option<KeySerial>,
}

impl Default for FabricsConfig {
    fn default() -> Self {
        Self {
            nr_io_queues: 0,
            nr_write_queues: 0,
            nr_poll_queues: 0,
            queue_size: 0,
            keep_alive_tmo: 0,
            reconnect_delay: 0,
            ctrl_loss_tmo: NVMF_DEF_CTRL_LOSS_TMO,
            fast_io_fail_tmo: 0,
            tos: -1,
            duplicate_connect: false,
            disable_sqflow: false,
            hdr_digest: false,
            data_digest: false,
            tls: false,
            concat: false,
            keyring: None,
            tls_key: None,
        }
    }
}
