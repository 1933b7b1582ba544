//! Localization objects and the provider that serves them.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use tracing::debug;

/// Translation key -> localized string.
pub type Translations = HashMap<String, String>;

/// A set of translations for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localization {
    pub language_id: String,
    pub language_name: Option<String>,
    pub localized_language_name: Option<String>,
    /// True when the translations come from an extension-contributed language pack.
    pub language_pack: bool,
    pub translations: Translations,
}

impl Localization {
    pub fn new(language_id: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            ..Default::default()
        }
    }

    pub fn with_translations<K, V>(mut self, translations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.translations
            .extend(translations.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Look up a translation key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }
}

/// Source of localizations consulted while generating NLS files.
///
/// Implementations are shared across extensions, so lookups and registration
/// go through `&self`.
pub trait LocalizationProvider: Send + Sync {
    /// Language ids for which at least one localization is registered.
    fn available_languages(&self) -> Vec<String>;

    /// Load the merged localization for a language.
    fn load_localization(&self, language_id: &str) -> Result<Arc<Localization>>;

    /// Register additional localizations.
    fn add_localizations(&self, localizations: Vec<Localization>);
}

/// A warning from loading translation files from a directory.
#[derive(Debug, Clone)]
pub struct LanguageLoadWarning {
    pub file_path: PathBuf,
    pub error: String,
}

/// In-process [`LocalizationProvider`].
///
/// Localizations registered for the same language are merged in registration
/// order, later ones winning on duplicate keys. The merged result is computed
/// once per language and reused until a new localization for that language
/// is registered.
#[derive(Debug, Default)]
pub struct LocalizationRegistry {
    registered: RwLock<BTreeMap<String, Vec<Localization>>>,
    loaded: Mutex<HashMap<String, Arc<Localization>>>,
}

impl LocalizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every `<lang>.json` file in `dir` as a flat key -> string mapping.
    ///
    /// Files that cannot be parsed are skipped and returned as warnings.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<LanguageLoadWarning>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            bail!("Languages directory '{}' does not exist.", dir.display());
        }

        let mut localizations = Vec::new();
        let mut warnings = Vec::new();

        let mut paths = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        paths.sort();

        for path in paths {
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(language_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match parse_translation_file(&path) {
                Ok(translations) => {
                    debug!(
                        language = language_id,
                        count = translations.len(),
                        "loaded translation file"
                    );
                    localizations.push(Localization {
                        translations,
                        ..Localization::new(language_id)
                    });
                }
                Err(e) => warnings.push(LanguageLoadWarning {
                    file_path: path.clone(),
                    error: format!("{:#}", e),
                }),
            }
        }

        self.add_localizations(localizations);
        Ok(warnings)
    }
}

impl LocalizationProvider for LocalizationRegistry {
    fn available_languages(&self) -> Vec<String> {
        let registered = self.registered.read().unwrap_or_else(|e| e.into_inner());
        registered.keys().cloned().collect()
    }

    fn load_localization(&self, language_id: &str) -> Result<Arc<Localization>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(localization) = loaded.get(language_id) {
            return Ok(Arc::clone(localization));
        }

        let registered = self.registered.read().unwrap_or_else(|e| e.into_inner());
        let parts = registered
            .get(language_id)
            .ok_or_else(|| anyhow!("No localization registered for language '{}'", language_id))?;

        let merged = Arc::new(merge(language_id, parts));
        loaded.insert(language_id.to_string(), Arc::clone(&merged));
        Ok(merged)
    }

    fn add_localizations(&self, localizations: Vec<Localization>) {
        if localizations.is_empty() {
            return;
        }
        let mut loaded = self.loaded.lock().unwrap_or_else(|e| e.into_inner());
        let mut registered = self.registered.write().unwrap_or_else(|e| e.into_inner());
        for localization in localizations {
            loaded.remove(&localization.language_id);
            registered
                .entry(localization.language_id.clone())
                .or_default()
                .push(localization);
        }
    }
}

fn merge(language_id: &str, parts: &[Localization]) -> Localization {
    let mut merged = Localization::new(language_id);
    for part in parts {
        if part.language_name.is_some() {
            merged.language_name = part.language_name.clone();
        }
        if part.localized_language_name.is_some() {
            merged.localized_language_name = part.localized_language_name.clone();
        }
        merged.language_pack |= part.language_pack;
        merged
            .translations
            .extend(part.translations.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

fn parse_translation_file(path: &Path) -> Result<Translations> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translation file: {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse translation file: {}", path.display()))?;
    let Value::Object(map) = json else {
        bail!(
            "Root of translation file must be an object: {}",
            path.display()
        );
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}
