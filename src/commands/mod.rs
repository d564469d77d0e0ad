//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `pman`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Commands that work on the resolved project list flatten [`ManifestArgs`]
//! into their arguments and call [`ManifestArgs::load`].

pub mod checkout;
pub mod completions;
pub mod dump;
pub mod fork;
pub mod status;
pub mod sync;
pub mod tree;

use anyhow::{anyhow, Result};
use clap::Args;
use log::debug;
use std::path::PathBuf;

use pman::defaults::{self, MANIFEST_ENV};
use pman::env::Environment;
use pman::manifest::{Manifest, ResolvedProject};
use pman::resolve::resolve;

/// Arguments shared by every command that reads the manifest.
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArgs {
    /// Path to the manifest file.
    ///
    /// Defaults to `pman.xml` in the current directory, then
    /// `.repo/manifest/default.xml`.
    #[arg(short, long, value_name = "FILE", env = MANIFEST_ENV)]
    pub manifest: Option<PathBuf>,
}

impl ManifestArgs {
    /// Locate and parse the manifest.
    pub fn load(&self) -> Result<Manifest> {
        let path = match &self.manifest {
            Some(path) => path.clone(),
            None => {
                let working_dir = std::env::current_dir()?;
                defaults::locate_manifest(&working_dir).ok_or_else(|| {
                    anyhow!(
                        "Manifest not found: no {} or {} in {}\n  hint: pass --manifest FILE or set {}",
                        defaults::DEFAULT_MANIFEST_FILENAME,
                        defaults::REPO_MANIFEST_PATH,
                        working_dir.display(),
                        MANIFEST_ENV
                    )
                })?
            }
        };

        let manifest = Manifest::from_file(&path)
            .map_err(|e| anyhow!("Failed to load manifest from {}: {}", path.display(), e))?;
        debug!("Loaded project manifest from {}", path.display());
        Ok(manifest)
    }

    /// Load the manifest and resolve it against the process environment.
    pub fn resolve(&self) -> Result<(Manifest, Vec<ResolvedProject>)> {
        let manifest = self.load()?;
        let projects = resolve(&manifest, &Environment::capture());
        Ok((manifest, projects))
    }
}
