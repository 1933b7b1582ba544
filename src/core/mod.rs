//! Localization deployment engine.
//!
//! - `extension`: extension metadata and language pack contributions
//! - `localization`: localization objects and the provider serving them
//! - `keys`: translation key construction
//! - `nls`: NLS metadata file names and shapes
//! - `file_scanner`: recursive file listing
//! - `service`: the deployment service tying these together

pub mod extension;
pub mod file_scanner;
pub mod keys;
pub mod localization;
pub mod nls;
pub mod service;

pub use extension::{ExtensionMetadata, LanguagePackContribution, TranslationSet};
pub use localization::{Localization, LocalizationProvider, LocalizationRegistry};
pub use service::{ExtensionOutcome, LocalizationDeploymentService};
