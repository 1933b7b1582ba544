use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Result of a write-if-missing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    AlreadyExists,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Written => "written",
            WriteOutcome::AlreadyExists => "already exists",
        }
    }
}

/// Write `value` as pretty JSON unless `path` already exists.
///
/// Uses 2-space indentation and adds a trailing newline. Parent directories
/// are created as needed. An existing file is never touched.
pub fn write_json_if_missing(path: &Path, value: &Value) -> Result<WriteOutcome> {
    if path.exists() {
        return Ok(WriteOutcome::AlreadyExists);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        // Lost a race with another writer; theirs stays.
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::AlreadyExists),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to write file: {}", path.display()));
        }
    };
    file.write_all(format!("{}\n", content).as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(WriteOutcome::Written)
}
