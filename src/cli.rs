//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use pman::defaults::LOG_LEVEL_ENV;
use pman::output::OutputConfig;

use crate::commands;

/// pman - Like repo, but less opinionated
#[derive(Parser, Debug)]
#[command(name = "pman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace) or an env_logger filter
    #[arg(
        short = 'L',
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        env = LOG_LEVEL_ENV
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize all repositories in the manifest
    Sync(commands::sync::SyncArgs),

    /// Checkout all repositories to a named branch, or the project-level branch if the named branch does not exist
    Checkout(commands::checkout::CheckoutArgs),

    /// Create a new branch in every repository
    Fork(commands::fork::ForkArgs),

    /// Show the current branch of each repository
    Status(commands::status::StatusArgs),

    /// Dump the evaluated project manifest as JSON
    DumpProjects(commands::dump::DumpArgs),

    /// Display the manifest project tree
    Tree(commands::tree::TreeArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args),
            Commands::Checkout(args) => commands::checkout::execute(args),
            Commands::Fork(args) => commands::fork::execute(args),
            Commands::Status(args) => commands::status::execute(args, &output),
            Commands::DumpProjects(args) => commands::dump::execute(args),
            Commands::Tree(args) => commands::tree::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
