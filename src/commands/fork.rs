//! # Fork Command Implementation
//!
//! This module implements the `fork` subcommand, which creates a new branch in
//! every project. With `--from`, each project first checks out (and pulls) the
//! source branch, falling back to its own revision when that branch is missing.

use anyhow::Result;
use clap::Args;

use pman::defaults::batch_jobs;
use pman::repository::ProjectManager;

use super::ManifestArgs;

/// Create a new branch in every repository
#[derive(Args, Debug)]
pub struct ForkArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Name of the branch to create.
    #[arg(value_name = "NEW_BRANCH")]
    pub branch: String,

    /// Branch to fork from. Defaults to whatever is checked out.
    #[arg(long, value_name = "BRANCH")]
    pub from: Option<String>,

    /// Number of projects to fork in parallel.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Execute the `fork` command.
pub fn execute(args: ForkArgs) -> Result<()> {
    let (manifest, projects) = args.manifest.resolve()?;
    let jobs = batch_jobs(args.jobs, manifest.sync_concurrency());

    ProjectManager::new().fork_all(&projects, &args.branch, args.from.as_deref(), jobs)?;
    Ok(())
}
