use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{error, warn};

use super::super::args::DeployCommand;
use super::{CommandResult, CommandSummary, DeploySummary, ExtensionReport};
use crate::{
    config::load_config,
    core::{
        ExtensionMetadata, ExtensionOutcome, LocalizationDeploymentService, LocalizationProvider,
        LocalizationRegistry, extension::MANIFEST_FILE_NAME, file_scanner::ScanFilter,
    },
};

/// An extension directory and its loaded manifest.
type DiscoveredExtension = (PathBuf, Result<ExtensionMetadata>);

pub fn deploy(cmd: DeployCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let cwd = env::current_dir().context("Failed to resolve working directory")?;
    let loaded = load_config(&cwd)?;
    let config = loaded.config;

    let plugins_dir = args
        .plugins_dir
        .map(|dir| cwd.join(dir))
        .unwrap_or_else(|| loaded.base_dir.join(&config.plugins_dir));
    let languages_dir = args
        .languages_dir
        .map(|dir| cwd.join(dir))
        .or_else(|| config.languages_dir.map(|dir| loaded.base_dir.join(dir)));

    let mut ignores = config.ignores;
    ignores.extend(args.ignores);
    let scan_filter = ScanFilter::new(&ignores)?;

    let registry = Arc::new(LocalizationRegistry::new());
    let language_warnings = match &languages_dir {
        Some(dir) => registry.load_dir(dir)?,
        None => Vec::new(),
    };
    for warning in &language_warnings {
        warn!(path = %warning.file_path.display(), error = %warning.error, "skipping translation file");
    }

    let service = LocalizationDeploymentService::new(registry.clone()).with_scan_filter(scan_filter);

    let discovered = discover_extensions(&plugins_dir)?;

    // Every pack is registered before any extension is localized, so a pack
    // shipped by one extension applies to all of them.
    for extension in discovered.iter().filter_map(|(_, ext)| ext.as_ref().ok()) {
        service.register_language_packs(extension);
    }

    let extensions: Vec<ExtensionReport> = discovered
        .par_iter()
        .map(|(dir, extension)| match extension {
            Ok(extension) => ExtensionReport {
                name: extension.id.clone(),
                outcome: service.localize_extension(extension),
            },
            Err(err) => {
                let name = dir_name(dir);
                let message = format!("{:#}", err);
                error!(extension = %name, error = %message, "failed to load extension manifest");
                ExtensionReport {
                    name,
                    outcome: ExtensionOutcome::Failed { error: message },
                }
            }
        })
        .collect();

    let summary = DeploySummary {
        plugins_dir,
        languages: registry.available_languages(),
        extensions,
        language_warnings,
    };

    Ok(CommandResult {
        error_count: summary.failed_count(),
        summary: CommandSummary::Deploy(summary),
    })
}

/// Subdirectories of `plugins_dir` with a manifest, sorted by path.
fn discover_extensions(plugins_dir: &Path) -> Result<Vec<DiscoveredExtension>> {
    if !plugins_dir.is_dir() {
        bail!(
            "Plugins directory '{}' does not exist.\n\
             Hint: Check your .nlsdeployrc.json 'pluginsDir' setting.",
            plugins_dir.display()
        );
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(plugins_dir)
        .with_context(|| format!("Failed to read directory: {}", plugins_dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() && path.join(MANIFEST_FILE_NAME).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();

    Ok(dirs
        .into_iter()
        .map(|dir| {
            let extension = ExtensionMetadata::from_package_root(&dir);
            (dir, extension)
        })
        .collect())
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string())
}
