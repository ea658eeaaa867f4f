//! Reading and writing whole documents.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::{ConfigResult, codec};

/// Where a stored document goes.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    /// Create or truncate the file at this path.
    Path(&'a Path),
    /// Write to standard output followed by a newline.
    Stdout,
}

/// Reads the whole file into memory.
///
/// # Errors
///
/// Returns [`crate::ConfigError::Io`] for missing or unreadable files.
pub fn read_document(path: &Path) -> ConfigResult<Vec<u8>> {
    fs::read(path).map_err(|err| {
        debug!(path = %path.display(), error = %err, "cannot read configuration");
        err.into()
    })
}

/// Serializes `value` to `destination`.
///
/// # Errors
///
/// Returns [`crate::ConfigError::Io`] when the destination cannot be written.
pub fn write_document(value: &Value, destination: Destination<'_>, pretty: bool) -> ConfigResult<()> {
    match destination {
        Destination::Path(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            codec::write(value, &mut writer, pretty)?;
            writer.flush()?;
        }
        Destination::Stdout => write_line(value, io::stdout().lock(), pretty)?,
    }
    Ok(())
}

/// Serializes `value` followed by a newline.
fn write_line<W: Write>(value: &Value, mut writer: W, pretty: bool) -> ConfigResult<()> {
    codec::write(value, &mut writer, pretty)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn console_output_ends_with_newline() {
        let mut out = Vec::new();
        write_line(&json!([{"hostnqn": "nqn.test"}]), &mut out, false).unwrap();
        assert_eq!(out, b"[{\"hostnqn\":\"nqn.test\"}]\n");

        let mut pretty = Vec::new();
        write_line(&json!([]), &mut pretty, true).unwrap();
        assert_eq!(pretty, b"[]\n");
    }

    #[test]
    fn file_output_has_no_trailing_newline() {
        let path = std::env::temp_dir().join(format!("fabric-document-{}.json", Uuid::new_v4()));
        write_document(&json!([]), Destination::Path(&path), false).unwrap();
        assert_eq!(read_document(&path).unwrap(), b"[]");
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("fabric-document-{}.json", Uuid::new_v4()));
        assert!(matches!(
            read_document(&path),
            Err(crate::ConfigError::Io { .. })
        ));
    }
}
