//! NVMe Qualified Names.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// NQN shared by every discovery subsystem on a fabric.
pub const NVME_DISC_SUBSYS_NAME: &str = "nqn.2014-08.org.nvmexpress.discovery";

/// Upper bound on NQN length in bytes, excluding the terminator.
const NVMF_NQN_SIZE: usize = 223;

/// NVMe Qualified Name identifying a host or a subsystem.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nqn(String);

impl Nqn {
    /// Creates a new NQN after validating its length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNqn`] if the name is empty, longer than 223
    /// bytes, or contains whitespace.
    pub fn new(nqn: impl Into<String>) -> Result<Self> {
        let nqn = nqn.into();
        if nqn.is_empty() {
            return Err(Error::InvalidNqn {
                nqn,
                reason: "nqn cannot be empty".into(),
            });
        }
        if nqn.len() > NVMF_NQN_SIZE {
            return Err(Error::InvalidNqn {
                nqn,
                reason: format!("nqn length must be <= {NVMF_NQN_SIZE}"),
            });
        }
        if nqn.chars().any(char::is_whitespace) {
            return Err(Error::InvalidNqn {
                nqn,
                reason: "nqn cannot contain whitespace".into(),
            });
        }
        Ok(Self(nqn))
    }

    /// Returns the NQN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the shared discovery subsystem NQN.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        self.0 == NVME_DISC_SUBSYS_NAME
    }
}

impl Display for Nqn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Nqn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Nqn {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Nqn> for String {
    fn from(value: Nqn) -> Self {
        value.0
    }
}

impl PartialEq<str> for Nqn {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
