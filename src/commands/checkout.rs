//! # Checkout Command Implementation
//!
//! This module implements the `checkout` subcommand. Every project is switched
//! to the named branch and pulled. Projects where the branch does not exist
//! fall back to their own configured revision.

use anyhow::Result;
use clap::Args;

use pman::defaults::batch_jobs;
use pman::repository::ProjectManager;

use super::ManifestArgs;

/// Checkout all repositories to a named branch
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// The branch to check out.
    #[arg(value_name = "BRANCH")]
    pub branch: String,

    /// Number of projects to check out in parallel.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs) -> Result<()> {
    let (manifest, projects) = args.manifest.resolve()?;
    let jobs = batch_jobs(args.jobs, manifest.sync_concurrency());

    ProjectManager::new().checkout_all(&projects, &args.branch, jobs)?;
    Ok(())
}
