//! # Project Lifecycle Management
//!
//! This module provides the `ProjectManager`, which drives resolved projects
//! through their lifecycle: cloning, updating, switching revisions and forking
//! new branches.
//!
//! ## Design
//!
//! Version-control access goes through the **`VersionControl`** trait. The
//! application uses `SystemGit`, which wraps the `git` binary; tests swap in
//! mock implementations to simulate failures without touching a real
//! repository.
//!
//! ## Operations
//!
//! - **Sync** clones a project that is not on disk yet. An existing working
//!   copy is checked out at the project's revision instead. A directory that
//!   is not a working copy is only replaced when forcing.
//! - **Checkout** selects a revision and pulls. When selecting the revision
//!   fails and fallback is allowed, the project's own revision is tried
//!   instead. Pull failures are never retried.
//! - **Fork** optionally checks out a source branch (with fallback), then
//!   creates and switches to a new branch without pulling.
//!
//! ## Batches
//!
//! The `*_all` variants run one operation over every project on a `rayon`
//! pool. Projects are independent, so every project is attempted; failures
//! are collected into a single [`Error::Batch`] once the batch completes.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{Error, ProjectFailure, Result};
use crate::git;
use crate::manifest::ResolvedProject;

/// Trait for version-control operations - allows mocking in tests
pub trait VersionControl: Send + Sync {
    /// Clone `url` into `target_dir`.
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Pull the currently checked out branch.
    fn pull(&self, working_dir: &Path) -> Result<()>;

    /// Check out `revision`. Failures must be [`Error::GitCheckout`] so they
    /// can be told apart from pull failures.
    fn select_revision(&self, working_dir: &Path, revision: &str) -> Result<()>;

    /// Create a new branch at HEAD and switch to it.
    fn create_and_switch_branch(&self, working_dir: &Path, branch: &str) -> Result<()>;

    /// The currently checked out branch or commit.
    fn current_revision(&self, working_dir: &Path) -> Result<String>;
}

/// The default implementation of `VersionControl`, which uses the system's
/// `git` command.
pub struct SystemGit;

impl VersionControl for SystemGit {
    fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
        git::clone(url, target_dir)
    }

    fn pull(&self, working_dir: &Path) -> Result<()> {
        git::pull(working_dir)
    }

    fn select_revision(&self, working_dir: &Path, revision: &str) -> Result<()> {
        git::select_revision(working_dir, revision)
    }

    fn create_and_switch_branch(&self, working_dir: &Path, branch: &str) -> Result<()> {
        git::create_and_switch_branch(working_dir, branch)
    }

    fn current_revision(&self, working_dir: &Path) -> Result<String> {
        git::current_revision(working_dir)
    }
}

/// Runs lifecycle operations for resolved projects.
pub struct ProjectManager {
    vcs: Box<dyn VersionControl>,
}

impl Default for ProjectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectManager {
    /// Creates a `ProjectManager` backed by the system `git` binary.
    pub fn new() -> Self {
        Self {
            vcs: Box::new(SystemGit),
        }
    }

    /// Creates a `ProjectManager` with a custom `VersionControl`
    /// implementation.
    pub fn with_vcs(vcs: Box<dyn VersionControl>) -> Self {
        Self { vcs }
    }

    /// Clone the project, or bring an existing working copy to its revision.
    ///
    /// An existing directory that is not a working copy is deleted first when
    /// `force` is set and is an [`Error::UnmanagedDirectory`] otherwise.
    pub fn sync_project(&self, project: &ResolvedProject, force: bool) -> Result<()> {
        let path = &project.path;

        if path.is_dir() {
            if git::is_working_copy(path) {
                self.checkout_project(project, &project.revision, false)?;
                return Ok(());
            }
            if !force {
                return Err(Error::UnmanagedDirectory { path: path.clone() });
            }
            warn!("Removing unmanaged directory {}", path.display());
            fs::remove_dir_all(path)?;
        }

        self.vcs.clone_repository(&project.fetch, path)
    }

    /// Check out `revision` and pull, returning the revision now checked out.
    ///
    /// With `fallback`, a failure to select `revision` is retried with the
    /// project's own revision.
    pub fn checkout_project(
        &self,
        project: &ResolvedProject,
        revision: &str,
        fallback: bool,
    ) -> Result<String> {
        match self.checkout_and_pull(&project.path, revision) {
            Ok(()) => Ok(revision.to_string()),
            Err(e)
                if fallback
                    && e.is_revision_selection_failure()
                    && !project.revision.is_empty()
                    && project.revision != revision =>
            {
                debug!(
                    "{}: {}; falling back to {}",
                    project.name, e, project.revision
                );
                self.checkout_and_pull(&project.path, &project.revision)?;
                Ok(project.revision.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Optionally check out `from` (with fallback), then create and switch to
    /// `branch`.
    pub fn fork_project(
        &self,
        project: &ResolvedProject,
        branch: &str,
        from: Option<&str>,
    ) -> Result<()> {
        if let Some(from) = from.filter(|from| !from.is_empty()) {
            self.checkout_project(project, from, true)?;
        }
        self.vcs.create_and_switch_branch(&project.path, branch)
    }

    /// The branch or commit currently checked out for `project`.
    pub fn status(&self, project: &ResolvedProject) -> Result<String> {
        self.vcs.current_revision(&project.path)
    }

    /// Sync every project. See [`ProjectManager::sync_project`].
    pub fn sync_all(&self, projects: &[ResolvedProject], force: bool, jobs: usize) -> Result<()> {
        let outcomes = self.for_each(projects, jobs, |project| {
            self.sync_project(project, force)?;
            info!("Synced {}", project.name);
            Ok(())
        });
        collect_outcomes("sync", projects, outcomes).map(|_| ())
    }

    /// Check out `revision` everywhere with fallback, returning the revision
    /// each project ended up on.
    pub fn checkout_all(
        &self,
        projects: &[ResolvedProject],
        revision: &str,
        jobs: usize,
    ) -> Result<Vec<String>> {
        let outcomes = self.for_each(projects, jobs, |project| {
            let now_on = self.checkout_project(project, revision, true)?;
            debug!("Project {} now on branch {}", project.name, now_on);
            Ok(now_on)
        });
        collect_outcomes("checkout", projects, outcomes)
    }

    /// Fork every project onto `branch`.
    pub fn fork_all(
        &self,
        projects: &[ResolvedProject],
        branch: &str,
        from: Option<&str>,
        jobs: usize,
    ) -> Result<()> {
        let outcomes = self.for_each(projects, jobs, |project| {
            self.fork_project(project, branch, from)?;
            info!("Forked {} onto {}", project.name, branch);
            Ok(())
        });
        collect_outcomes("fork", projects, outcomes).map(|_| ())
    }

    /// Current revision of every project. Failures are reported per project.
    pub fn status_all(&self, projects: &[ResolvedProject], jobs: usize) -> Vec<Result<String>> {
        self.for_each(projects, jobs, |project| self.status(project))
    }

    fn checkout_and_pull(&self, working_dir: &Path, revision: &str) -> Result<()> {
        if revision.is_empty() {
            return Ok(());
        }
        self.vcs.select_revision(working_dir, revision)?;
        self.vcs.pull(working_dir)
    }

    /// Apply `op` to every project, preserving input order in the output.
    fn for_each<T, F>(&self, projects: &[ResolvedProject], jobs: usize, op: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&ResolvedProject) -> Result<T> + Send + Sync,
    {
        if jobs <= 1 || projects.len() <= 1 {
            return projects.iter().map(&op).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| projects.par_iter().map(&op).collect()),
            Err(e) => {
                warn!("Failed to start {} worker threads ({}), running sequentially", jobs, e);
                projects.iter().map(&op).collect()
            }
        }
    }
}

/// Fold per-project outcomes into either every success value or one
/// [`Error::Batch`] naming each failing project.
pub fn collect_outcomes<T>(
    operation: &str,
    projects: &[ResolvedProject],
    outcomes: Vec<Result<T>>,
) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for (project, outcome) in projects.iter().zip(outcomes) {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => failures.push(ProjectFailure {
                project: project.name.clone(),
                error,
            }),
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(Error::Batch {
            operation: operation.to_string(),
            failures,
        })
    }
}
