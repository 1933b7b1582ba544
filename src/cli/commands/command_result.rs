use std::path::PathBuf;

use crate::core::{ExtensionOutcome, localization::LanguageLoadWarning};

#[derive(Debug)]
pub enum CommandSummary {
    Deploy(DeploySummary),
    Init(InitSummary),
}

/// Outcome for one extension directory.
#[derive(Debug)]
pub struct ExtensionReport {
    /// Extension id, or the directory name when the manifest could not be loaded.
    pub name: String,
    pub outcome: ExtensionOutcome,
}

#[derive(Debug)]
pub struct DeploySummary {
    pub plugins_dir: PathBuf,
    pub languages: Vec<String>,
    pub extensions: Vec<ExtensionReport>,
    pub language_warnings: Vec<LanguageLoadWarning>,
}

impl DeploySummary {
    pub fn generated_count(&self) -> usize {
        self.extensions
            .iter()
            .map(|ext| match &ext.outcome {
                ExtensionOutcome::Localized { generated } => generated.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn failed_count(&self) -> usize {
        self.extensions
            .iter()
            .filter(|ext| matches!(ext.outcome, ExtensionOutcome::Failed { .. }))
            .count()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running nlsdeploy commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
}
