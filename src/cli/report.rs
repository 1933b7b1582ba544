//! Report formatting and printing utilities.
//!
//! Separate from core logic so the deployment service can be used as a library.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, DeploySummary, ExtensionReport, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::ExtensionOutcome;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Mark for extensions that had nothing to localize.
pub const SKIP_MARK: &str = "-";

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Deploy(summary) => {
            print_deploy_warnings_to(summary, &mut io::stderr().lock());
            print_deploy_to(summary, verbose, &mut io::stdout().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
    }
}

/// Print warnings about translation files that could not be loaded.
pub fn print_deploy_warnings_to<W: Write>(summary: &DeploySummary, writer: &mut W) {
    for warning in &summary.language_warnings {
        let _ = writeln!(
            writer,
            "{} skipped translation file {}: {}",
            "warning:".bold().yellow(),
            warning.file_path.display(),
            warning.error
        );
    }
}

/// Print one line per extension followed by a summary.
pub fn print_deploy_to<W: Write>(summary: &DeploySummary, verbose: bool, writer: &mut W) {
    if summary.extensions.is_empty() {
        let _ = writeln!(
            writer,
            "No extensions found in {}",
            summary.plugins_dir.display()
        );
        return;
    }

    for extension in &summary.extensions {
        print_extension(extension, &summary.plugins_dir, verbose, writer);
    }

    print_summary(summary, writer);
}

fn print_extension<W: Write>(
    extension: &ExtensionReport,
    plugins_dir: &Path,
    verbose: bool,
    writer: &mut W,
) {
    match &extension.outcome {
        ExtensionOutcome::Localized { generated } => {
            let _ = writeln!(
                writer,
                "{} {}: {} {} generated",
                SUCCESS_MARK.green(),
                extension.name.bold(),
                generated.len(),
                plural(generated.len(), "file", "files")
            );
            if verbose {
                for path in generated {
                    let shown = path.strip_prefix(plugins_dir).unwrap_or(path);
                    let _ = writeln!(writer, "    {}", shown.display().to_string().dimmed());
                }
            }
        }
        ExtensionOutcome::NoMetadata => {
            let _ = writeln!(
                writer,
                "{} {}: nothing to localize",
                SKIP_MARK.dimmed(),
                extension.name.bold()
            );
        }
        ExtensionOutcome::Failed { error } => {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                FAILURE_MARK.red(),
                extension.name.bold(),
                error.red()
            );
        }
    }
}

fn print_summary<W: Write>(summary: &DeploySummary, writer: &mut W) {
    let extensions = summary.extensions.len();
    let generated = summary.generated_count();
    let failed = summary.failed_count();
    let languages = if summary.languages.is_empty() {
        "none".to_string()
    } else {
        summary.languages.join(", ")
    };

    let line = format!(
        "{} {}, {} {} generated (languages: {})",
        extensions,
        plural(extensions, "extension", "extensions"),
        generated,
        plural(generated, "file", "files"),
        languages
    );

    if failed > 0 {
        let _ = writeln!(
            writer,
            "\n{} {}, {} failed",
            FAILURE_MARK.red(),
            line,
            failed.to_string().red()
        );
    } else {
        let _ = writeln!(writer, "\n{} {}", SUCCESS_MARK.green(), line.green());
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
