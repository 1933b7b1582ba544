//! NLS file names and on-disk shapes.
//!
//! Three inputs are read from an extension's package root:
//!
//! - `package.nls.json`: key -> default string (or `{ "message", "comment" }`)
//! - `nls.metadata.json`: file key -> `{ "keys": [...], "messages": [...] }`
//! - `*.nls.metadata.json`: `{ "filePath", "keys": [...], "messages": [...] }`
//!
//! `keys[i]` pairs with `messages[i]`. A key is either a plain string or
//! `{ "key", "comment" }`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const PACKAGE_NLS_FILE: &str = "package.nls.json";
pub const BUNDLE_METADATA_FILE: &str = "nls.metadata.json";
pub const ENTRY_METADATA_SUFFIX: &str = ".nls.metadata.json";

/// `<root>/package.nls.<lang>.json`
pub fn package_nls_path(root: &Path, language_id: &str) -> PathBuf {
    root.join(format!("package.nls.{}.json", language_id))
}

/// `nls.bundle.<lang>.json` next to the bundle metadata file.
pub fn bundle_output_path(bundle_path: &Path, language_id: &str) -> PathBuf {
    bundle_path.with_file_name(format!("nls.bundle.{}.json", language_id))
}

/// `<root>/<filePath>.nls.<lang>.json`
pub fn entry_output_path(root: &Path, file_path: &str, language_id: &str) -> PathBuf {
    root.join(format!("{}.nls.{}.json", file_path, language_id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataFileKind {
    Bundle,
    Entry,
}

/// Classify a path by its file name.
pub fn metadata_file_kind(path: &Path) -> Option<MetadataFileKind> {
    let name = path.file_name()?.to_str()?;
    if name == BUNDLE_METADATA_FILE {
        Some(MetadataFileKind::Bundle)
    } else if name.ends_with(ENTRY_METADATA_SUFFIX) {
        Some(MetadataFileKind::Entry)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NlsKey {
    Plain(String),
    Commented {
        key: String,
        #[serde(default)]
        comment: Vec<String>,
    },
}

impl NlsKey {
    pub fn key(&self) -> &str {
        match self {
            NlsKey::Plain(key) => key,
            NlsKey::Commented { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NlsMessage {
    Plain(String),
    Commented {
        message: String,
        #[serde(default)]
        comment: Vec<String>,
    },
}

impl NlsMessage {
    pub fn message(&self) -> &str {
        match self {
            NlsMessage::Plain(message) => message,
            NlsMessage::Commented { message, .. } => message,
        }
    }
}

/// Parallel `keys` / `messages` arrays for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NlsEntry {
    #[serde(default)]
    pub keys: Vec<NlsKey>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Contents of a `*.nls.metadata.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlsEntryFile {
    pub file_path: String,
    #[serde(flatten)]
    pub entry: NlsEntry,
}

/// Read a JSON file whose root must be an object, keeping key order.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}

/// Read `package.nls.json` as ordered (key, default message) pairs.
pub fn read_package_nls(path: &Path) -> Result<Vec<(String, NlsMessage)>> {
    read_json_object(path)?
        .into_iter()
        .map(|(key, value)| {
            let message = serde_json::from_value(value).with_context(|| {
                format!("Invalid message for '{}' in {}", key, path.display())
            })?;
            Ok((key, message))
        })
        .collect()
}

/// Read `nls.metadata.json` as ordered (file key, entry) pairs.
pub fn read_bundle(path: &Path) -> Result<Vec<(String, NlsEntry)>> {
    read_json_object(path)?
        .into_iter()
        .map(|(file_key, value)| {
            let entry = serde_json::from_value(value).with_context(|| {
                format!("Invalid entry '{}' in {}", file_key, path.display())
            })?;
            Ok((file_key, entry))
        })
        .collect()
}

/// Read a `*.nls.metadata.json` file.
pub fn read_entry_file(path: &Path) -> Result<NlsEntryFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse NLS metadata: {}", path.display()))
}
