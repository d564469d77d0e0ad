//! # Error Handling
//!
//! This module defines the centralized error type for `pman`. It uses the
//! `thiserror` library to describe every anticipated failure mode with a
//! clear, contextual message.
//!
//! The variants fall into four groups:
//!
//! - **Configuration errors**: the manifest could not be parsed, names a
//!   remote that does not exist, or declares no remotes at all.
//! - **Conflict errors**: an unmanaged directory already occupies the path a
//!   project should be cloned into.
//! - **Version-control failures**: `git clone`, `checkout`, `pull` or branch
//!   creation failed. Checkout failures are kept distinct from pull failures
//!   so callers can decide whether a fallback revision should be tried.
//! - **Aggregates**: batch operations never stop at the first failing
//!   project; every failure is collected into [`Error::Batch`].
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions throughout the library.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pman operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest document could not be parsed.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A project (or the default template) names a remote that is not declared.
    #[error("Project {project}: remote {remote:?} does not exist")]
    UnknownRemote { project: String, remote: String },

    /// The manifest declares no remotes, so no fetch URL can be built.
    #[error("No remotes specified in manifest")]
    NoRemotes,

    /// A path component cannot be joined onto an opaque URL with a query or
    /// fragment, such as `mailto:x?subject=y`.
    #[error("Cannot join {component:?} onto {base:?}")]
    InvalidJoinBase { base: String, component: String },

    /// A project's fields could not be merged with its inherited context.
    #[error("Failed to populate project {project}: {message}")]
    Merge { project: String, message: String },

    /// A directory that is not a git working copy occupies a project path.
    #[error("Unmanaged directory already exists at {}", path.display())]
    UnmanagedDirectory { path: PathBuf },

    /// An operation needed an existing working copy but the path is missing.
    #[error("No such directory {}", path.display())]
    MissingWorkingCopy { path: PathBuf },

    /// `git clone` failed.
    #[error("Git clone error for {url} into {}: {message}", path.display())]
    GitClone {
        url: String,
        path: PathBuf,
        message: String,
    },

    /// Selecting a revision (`git checkout <rev>`) failed.
    #[error("Checkout failed in {} for {revision}: {stderr}", path.display())]
    GitCheckout {
        path: PathBuf,
        revision: String,
        stderr: String,
    },

    /// `git pull` failed after the revision was selected.
    #[error("Pull failed in {}: {stderr}", path.display())]
    GitPull { path: PathBuf, stderr: String },

    /// Creating and switching to a new branch failed.
    #[error("Branch creation failed in {} for {branch}: {stderr}", path.display())]
    GitBranch {
        path: PathBuf,
        branch: String,
        stderr: String,
    },

    /// Any other git command failed.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// One or more projects failed during a batch operation.
    #[error("{operation} failed for {} project(s):{}", failures.len(), ProjectFailure::list(failures))]
    Batch {
        operation: String,
        failures: Vec<ProjectFailure>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error happened while selecting a revision, as opposed to
    /// any later step. Only these failures are retried with a fallback
    /// revision.
    pub fn is_revision_selection_failure(&self) -> bool {
        matches!(self, Error::GitCheckout { .. })
    }
}

/// A single project's failure inside an [`Error::Batch`].
#[derive(Debug)]
pub struct ProjectFailure {
    /// Resolved project name
    pub project: String,
    pub error: Error,
}

impl ProjectFailure {
    fn list(failures: &[ProjectFailure]) -> String {
        failures.iter().map(|f| format!("\n  {}", f)).collect()
    }
}

impl fmt::Display for ProjectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.project, self.error)
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
