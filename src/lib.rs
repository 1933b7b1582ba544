//! nlsdeploy - NLS file generation for deployed IDE extensions
//!
//! nlsdeploy registers the language packs that extensions contribute and
//! writes translated copies of each extension's NLS files
//! (`package.nls.<lang>.json`, `nls.bundle.<lang>.json`,
//! `<file>.nls.<lang>.json`) so extension UI text shows up in the user's
//! language. Files that already exist are left alone.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Localization provider, extension model and deployment service
//! - `json_writer`: Write-if-missing JSON output

pub mod cli;
pub mod config;
pub mod core;
pub mod json_writer;
