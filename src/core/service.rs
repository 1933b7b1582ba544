//! Localization deployment for a single extension.
//!
//! Registration hands an extension's language packs to the provider.
//! Localization writes the missing `package.nls.<lang>.json`,
//! `nls.bundle.<lang>.json` and `<file>.nls.<lang>.json` files under the
//! extension root. Existing output files are never rewritten.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::json_writer::{WriteOutcome, write_json_if_missing};

use super::{
    extension::{ExtensionMetadata, LanguagePackContribution},
    file_scanner::{ScanFilter, list_files},
    keys::{PACKAGE_SCOPE, translation_key},
    localization::{Localization, LocalizationProvider, Translations},
    nls::{
        MetadataFileKind, NlsEntry, PACKAGE_NLS_FILE, bundle_output_path, entry_output_path,
        metadata_file_kind, package_nls_path, read_bundle, read_entry_file, read_package_nls,
    },
};

/// What `localize_extension` did for one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// `package.nls.json` was found; lists the files written by this run.
    Localized { generated: Vec<PathBuf> },
    /// No `package.nls.json`, so nothing was generated.
    NoMetadata,
    /// Localization stopped on an error, which has already been logged.
    Failed { error: String },
}

pub struct LocalizationDeploymentService {
    provider: Arc<dyn LocalizationProvider>,
    scan_filter: ScanFilter,
}

impl LocalizationDeploymentService {
    pub fn new(provider: Arc<dyn LocalizationProvider>) -> Self {
        Self {
            provider,
            scan_filter: ScanFilter::default(),
        }
    }

    pub fn with_scan_filter(mut self, scan_filter: ScanFilter) -> Self {
        self.scan_filter = scan_filter;
        self
    }

    /// Flatten the extension's language packs and register them in one call.
    ///
    /// Does nothing when the extension declares no packs. Provider errors are
    /// not handled here.
    pub fn register_language_packs(&self, extension: &ExtensionMetadata) {
        let Some(contributions) = &extension.localizations else {
            return;
        };
        if contributions.is_empty() {
            return;
        }

        let localizations: Vec<Localization> =
            contributions.iter().map(flatten_language_pack).collect();
        debug!(
            extension = %extension.id,
            count = localizations.len(),
            "registering language packs"
        );
        self.provider.add_localizations(localizations);
    }

    /// Generate every missing translated file for an extension.
    ///
    /// Never fails: errors are logged against the extension id and returned as
    /// [`ExtensionOutcome::Failed`].
    pub fn localize_extension(&self, extension: &ExtensionMetadata) -> ExtensionOutcome {
        match self.try_localize_extension(extension) {
            Ok(Some(generated)) => ExtensionOutcome::Localized { generated },
            Ok(None) => ExtensionOutcome::NoMetadata,
            Err(err) => {
                let message = format!("{:#}", err);
                error!(extension = %extension.id, error = %message, "failed to localize extension");
                ExtensionOutcome::Failed { error: message }
            }
        }
    }

    fn try_localize_extension(&self, extension: &ExtensionMetadata) -> Result<Option<Vec<PathBuf>>> {
        let root = extension.package_root()?;
        let Some(mut generated) = self.localize_package_metadata(&extension.id, &root)? else {
            return Ok(None);
        };
        generated.extend(self.localize_bundled_files(&extension.id, &root)?);
        Ok(Some(generated))
    }

    /// Generate `package.nls.<lang>.json` for each available language.
    ///
    /// Returns `None` when there are no languages or no `package.nls.json`,
    /// otherwise the files written (possibly none, if all already existed).
    pub fn localize_package_metadata(
        &self,
        extension_id: &str,
        root: &Path,
    ) -> Result<Option<Vec<PathBuf>>> {
        let languages = self.provider.available_languages();
        if languages.is_empty() {
            return Ok(None);
        }

        let nls_path = root.join(PACKAGE_NLS_FILE);
        if !nls_path.exists() {
            return Ok(None);
        }

        let messages = read_package_nls(&nls_path)?;
        let mut generated = Vec::new();

        for language_id in &languages {
            let output = package_nls_path(root, language_id);
            if output.exists() {
                debug!(path = %output.display(), "skipping existing file");
                continue;
            }

            let localization = self.provider.load_localization(language_id)?;
            let translated: Map<String, Value> = messages
                .iter()
                .map(|(key, message)| {
                    let value = localization
                        .get(&translation_key(extension_id, PACKAGE_SCOPE, key))
                        .unwrap_or(message.message());
                    (key.clone(), Value::String(value.to_string()))
                })
                .collect();

            write_output(&mut generated, output, &Value::Object(translated))?;
        }

        Ok(Some(generated))
    }

    /// Scan the extension tree for NLS metadata and localize it.
    ///
    /// The first `nls.metadata.json` (by path) wins and entry files are then
    /// ignored; without a bundle every `*.nls.metadata.json` is localized.
    pub fn localize_bundled_files(&self, extension_id: &str, root: &Path) -> Result<Vec<PathBuf>> {
        let files = list_files(root, &self.scan_filter)?;

        let mut bundle = None;
        let mut entries = Vec::new();
        for file in files {
            match metadata_file_kind(&file) {
                Some(MetadataFileKind::Bundle) => {
                    bundle = Some(file);
                    break;
                }
                Some(MetadataFileKind::Entry) => entries.push(file),
                None => {}
            }
        }

        if let Some(bundle) = bundle {
            if !entries.is_empty() {
                debug!(
                    bundle = %bundle.display(),
                    ignored = entries.len(),
                    "bundle found, ignoring entry files"
                );
            }
            return self.localize_bundle(extension_id, &bundle);
        }

        let generated = entries
            .par_iter()
            .map(|entry| self.localize_entry(extension_id, root, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(generated.into_iter().flatten().collect())
    }

    /// Generate `nls.bundle.<lang>.json` next to `bundle_path`.
    pub fn localize_bundle(&self, extension_id: &str, bundle_path: &Path) -> Result<Vec<PathBuf>> {
        let bundle = read_bundle(bundle_path)?;
        let mut generated = Vec::new();

        for language_id in self.provider.available_languages() {
            let output = bundle_output_path(bundle_path, &language_id);
            if output.exists() {
                debug!(path = %output.display(), "skipping existing file");
                continue;
            }

            let localization = self.provider.load_localization(&language_id)?;
            let translated: Map<String, Value> = bundle
                .iter()
                .map(|(file_key, entry)| {
                    (
                        file_key.clone(),
                        translate_entry(&localization, extension_id, file_key, entry),
                    )
                })
                .collect();

            write_output(&mut generated, output, &Value::Object(translated))?;
        }

        Ok(generated)
    }

    /// Generate `<root>/<filePath>.nls.<lang>.json` for one entry file.
    pub fn localize_entry(
        &self,
        extension_id: &str,
        root: &Path,
        entry_path: &Path,
    ) -> Result<Vec<PathBuf>> {
        let entry_file = read_entry_file(entry_path)?;
        let mut generated = Vec::new();

        for language_id in self.provider.available_languages() {
            let output = entry_output_path(root, &entry_file.file_path, &language_id);
            if output.exists() {
                debug!(path = %output.display(), "skipping existing file");
                continue;
            }

            let localization = self.provider.load_localization(&language_id)?;
            let translated = translate_entry(
                &localization,
                extension_id,
                &entry_file.file_path,
                &entry_file.entry,
            );

            write_output(&mut generated, output, &translated)?;
        }

        Ok(generated)
    }
}

/// Collapse a language pack into a single localization keyed by
/// `{translationId}/{normalizedScope}/{key}`.
fn flatten_language_pack(contribution: &LanguagePackContribution) -> Localization {
    let translations: Translations = contribution
        .translations
        .iter()
        .flat_map(|set| {
            set.contents.iter().flat_map(move |(scope, values)| {
                values
                    .iter()
                    .map(move |(key, value)| (translation_key(&set.id, scope, key), value.clone()))
            })
        })
        .collect();

    Localization {
        language_id: contribution.language_id.clone(),
        language_name: contribution.language_name.clone(),
        localized_language_name: contribution.localized_language_name.clone(),
        language_pack: true,
        translations,
    }
}

/// Translate an entry into an array aligned with its `keys`.
///
/// A key with neither a translation nor a message becomes `null`.
fn translate_entry(
    localization: &Localization,
    extension_id: &str,
    file_key: &str,
    entry: &NlsEntry,
) -> Value {
    Value::Array(
        entry
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                localization
                    .get(&translation_key(extension_id, file_key, key.key()))
                    .or_else(|| entry.messages.get(i).map(String::as_str))
                    .map_or(Value::Null, |s| Value::String(s.to_string()))
            })
            .collect(),
    )
}

fn write_output(generated: &mut Vec<PathBuf>, output: PathBuf, value: &Value) -> Result<()> {
    let outcome = write_json_if_missing(&output, value)?;
    debug!(path = %output.display(), outcome = outcome.as_str(), "generated file");
    if outcome == WriteOutcome::Written {
        generated.push(output);
    }
    Ok(())
}
