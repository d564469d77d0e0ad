//! Default values for pman configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Manifest file looked for in the working directory.
pub const DEFAULT_MANIFEST_FILENAME: &str = "pman.xml";

/// Manifest location inside a checked-out manifest repository.
pub const REPO_MANIFEST_PATH: &str = ".repo/manifest/default.xml";

/// Environment variable overriding the manifest location.
pub const MANIFEST_ENV: &str = "PMAN_MANIFEST";

/// Environment variable holding the log filter.
pub const LOG_LEVEL_ENV: &str = "LOGLEVEL";

/// Find the manifest to use in `working_dir`.
///
/// Candidates are checked in order: `pman.xml`, then
/// `.repo/manifest/default.xml`. Only non-empty files count.
pub fn locate_manifest(working_dir: &Path) -> Option<PathBuf> {
    [DEFAULT_MANIFEST_FILENAME, REPO_MANIFEST_PATH]
        .iter()
        .map(|candidate| working_dir.join(candidate))
        .find(|path| path.metadata().is_ok_and(|m| m.is_file() && m.len() > 0))
}

/// Number of parallel jobs for batch commands.
///
/// An explicit request wins, then the manifest's `sync-j` hint. Without
/// either, batches run one project at a time.
pub fn batch_jobs(requested: Option<usize>, manifest_hint: Option<usize>) -> usize {
    requested.or(manifest_hint).unwrap_or(1).max(1)
}
