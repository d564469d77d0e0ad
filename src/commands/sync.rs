//! # Sync Command Implementation
//!
//! This module implements the `sync` subcommand, which clones every project in
//! the manifest that is not on disk yet and brings existing working copies to
//! their configured revision.
//!
//! A directory that exists but is not a git working copy is left alone and
//! reported, unless `--force` is given, in which case it is deleted and cloned
//! fresh. Every project is attempted; failures are reported together at the end.

use anyhow::Result;
use clap::Args;

use pman::defaults::batch_jobs;
use pman::repository::ProjectManager;

use super::ManifestArgs;

/// Synchronize all repositories in the manifest
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Force overwriting existing working directories.
    #[arg(short, long)]
    pub force: bool,

    /// Number of projects to sync in parallel.
    ///
    /// Defaults to the `sync-j` hint of the manifest's first remote.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    let (manifest, projects) = args.manifest.resolve()?;
    let jobs = batch_jobs(args.jobs, manifest.sync_concurrency());

    ProjectManager::new().sync_all(&projects, args.force, jobs)?;
    Ok(())
}
