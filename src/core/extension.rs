//! Extension metadata as supplied by the deployment pipeline.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use url::Url;

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// scope -> key -> localized value
pub type ScopedTranslations = BTreeMap<String, BTreeMap<String, String>>;

/// Translations contributed under one id, usually the id of the extension
/// being translated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet {
    pub id: String,
    pub contents: ScopedTranslations,
}

/// A language pack declared by an extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagePackContribution {
    pub language_id: String,
    pub language_name: Option<String>,
    pub localized_language_name: Option<String>,
    pub translations: Vec<TranslationSet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    pub id: String,
    /// `file://` URI or plain path of the extension's package root.
    pub package_uri: String,
    pub localizations: Option<Vec<LanguagePackContribution>>,
}

impl ExtensionMetadata {
    pub fn new(id: impl Into<String>, package_root: impl AsRef<Path>) -> Self {
        Self {
            id: id.into(),
            package_uri: to_file_uri(package_root.as_ref()),
            localizations: None,
        }
    }

    /// Resolve the package root directory from `package_uri`.
    pub fn package_root(&self) -> Result<PathBuf> {
        package_root_from_uri(&self.package_uri)
    }

    /// Load metadata from `<root>/package.json`, reading every translation file
    /// referenced by `contributes.localizations`.
    pub fn from_package_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let content = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
        let manifest: PackageManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?;

        let Some(name) = manifest.name else {
            bail!("Manifest has no 'name': {}", manifest_path.display());
        };
        let id = match manifest.publisher {
            Some(publisher) => format!("{}.{}", publisher, name),
            None => name,
        };

        let localizations = manifest
            .contributes
            .localizations
            .map(|contributions| {
                contributions
                    .into_iter()
                    .map(|contribution| contribution.load(root))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            localizations,
            ..Self::new(id, root)
        })
    }
}

/// Percent-encoded `file://` URI for `path`.
///
/// Falls back to the plain path when it cannot be made absolute.
pub fn to_file_uri(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|_| absolute.to_string_lossy().to_string())
}

/// Resolve a `file://` URI or a plain path to a filesystem path.
///
/// Single-letter schemes are read as Windows drive letters, not URIs.
pub fn package_root_from_uri(uri: &str) -> Result<PathBuf> {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|_| anyhow!("Invalid file URI: {}", uri)),
        Ok(url) if url.scheme().len() > 1 => {
            bail!("Unsupported package URI scheme '{}': {}", url.scheme(), uri)
        }
        _ => Ok(PathBuf::from(uri)),
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    publisher: Option<String>,
    #[serde(default)]
    contributes: Contributes,
}

#[derive(Debug, Default, Deserialize)]
struct Contributes {
    localizations: Option<Vec<LocalizationManifest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizationManifest {
    language_id: String,
    language_name: Option<String>,
    localized_language_name: Option<String>,
    #[serde(default)]
    translations: Vec<TranslationManifest>,
}

#[derive(Debug, Deserialize)]
struct TranslationManifest {
    id: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct TranslationFile {
    #[serde(default)]
    contents: ScopedTranslations,
}

impl LocalizationManifest {
    fn load(self, root: &Path) -> Result<LanguagePackContribution> {
        let translations = self
            .translations
            .into_iter()
            .map(|translation| {
                let path = root.join(&translation.path);
                let content = fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read translation file: {}", path.display())
                })?;
                let file: TranslationFile = serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse translation file: {}", path.display())
                })?;
                Ok(TranslationSet {
                    id: translation.id,
                    contents: file.contents,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LanguagePackContribution {
            language_id: self.language_id,
            language_name: self.language_name,
            localized_language_name: self.localized_language_name,
            translations,
        })
    }
}
