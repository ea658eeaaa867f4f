//! JSON document codec.

use std::io::Write;

use serde_json::Value;

use crate::{ConfigError, ConfigResult};

/// Parses a complete document. Trailing data, malformed tokens, and empty
/// input are all rejected.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the bytes are not a single JSON value.
pub fn parse(bytes: &[u8]) -> ConfigResult<Value> {
    serde_json::from_slice(bytes).map_err(|source| ConfigError::Parse { source })
}

/// Serializes `value` to `writer`, keeping object keys in insertion order.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the writer fails.
pub fn write<W: Write>(value: &Value, writer: W, pretty: bool) -> ConfigResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, value)
    } else {
        serde_json::to_writer(writer, value)
    };
    result.map_err(|err| ConfigError::Io { source: err.into() })
}
