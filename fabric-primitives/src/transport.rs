//! Transport kinds.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Medium a controller is reached over.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Transport {
    /// Local PCIe attachment; carries no fabric addressing.
    Pcie,
    /// NVMe/TCP, the only transport that supports TLS.
    Tcp,
    /// RDMA fabrics.
    Rdma,
    /// Fibre Channel.
    Fc,
    /// In-kernel loopback target.
    Loop,
    /// Any other transport name, kept verbatim.
    Other(String),
}

impl Transport {
    /// Returns the canonical transport string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pcie => "pcie",
            Self::Tcp => "tcp",
            Self::Rdma => "rdma",
            Self::Fc => "fc",
            Self::Loop => "loop",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for transports that can carry a TLS PSK.
    #[must_use]
    pub fn supports_tls(&self) -> bool {
        matches!(self, Self::Tcp)
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => return Err(Error::EmptyTransport),
            "pcie" => Self::Pcie,
            "tcp" => Self::Tcp,
            "rdma" => Self::Rdma,
            "fc" => Self::Fc,
            "loop" => Self::Loop,
            other => Self::Other(other.to_owned()),
        })
    }
}

impl TryFrom<String> for Transport {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Transport> for String {
    fn from(value: Transport) -> Self {
        match value {
            Transport::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_unknown() {
        assert_eq!("tcp".parse::<Transport>().unwrap(), Transport::Tcp);
        assert_eq!("loop".parse::<Transport>().unwrap(), Transport::Loop);
        assert_eq!(
            "vfio-user".parse::<Transport>().unwrap(),
            Transport::Other("vfio-user".into())
        );
        assert!("".parse::<Transport>().is_err());
    }

    #[test]
    fn only_tcp_supports_tls() {
        assert!(Transport::Tcp.supports_tls());
        assert!(!Transport::Rdma.supports_tls());
        assert!(!Transport::Loop.supports_tls());
    }
}
