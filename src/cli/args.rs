//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `deploy`: Register language packs and generate translated NLS files
//! - `init`: Initialize nlsdeploy configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Deploy(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct DeployArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory containing one subdirectory per extension (overrides config file)
    #[arg(long)]
    pub plugins_dir: Option<PathBuf>,

    /// Directory of <lang>.json translation files (overrides config file)
    #[arg(long)]
    pub languages_dir: Option<PathBuf>,

    /// Extra glob patterns excluded from the NLS metadata scan
    /// Can be specified multiple times: --ignore '**/node_modules/**' --ignore test
    #[arg(long = "ignore")]
    pub ignores: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DeployCommand {
    #[command(flatten)]
    pub args: DeployArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register extension language packs and generate missing translated NLS files
    Deploy(DeployCommand),
    /// Initialize a new .nlsdeployrc.json configuration file
    Init,
}
