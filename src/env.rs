//! # Environment Expansion
//!
//! Manifest string fields may reference process environment variables with
//! `$VAR` or `${VAR}`. Expansion runs against an explicit [`Environment`]
//! snapshot rather than the live process environment, so resolving a
//! manifest is a pure function of the manifest and the snapshot.
//!
//! Unset variables expand to the empty string, as in a POSIX shell.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::manifest::ProjectDefinition;

/// A snapshot of environment variables and the invoking user's home directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    home: Option<PathBuf>,
}

impl Environment {
    /// An empty environment with no variables and no home directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
            home: dirs::home_dir(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Substitute `$VAR` and `${VAR}` references in `input`.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name: &str| {
            Some(self.var(name).unwrap_or(""))
        })
        .into_owned()
    }

    /// Expand a leading `~` to the home directory. Without a known home
    /// directory the input is returned unchanged.
    pub fn expand_home(&self, path: &str) -> String {
        shellexpand::tilde_with_context(path, || self.home().and_then(Path::to_str)).into_owned()
    }

    /// Expand every string field of a project definition.
    ///
    /// Nested definitions are not copied: the returned definition has no
    /// children, callers keep walking the original tree.
    pub fn expand_definition(&self, definition: &ProjectDefinition) -> ProjectDefinition {
        ProjectDefinition {
            name: self.expand(&definition.name),
            path: self.expand(&definition.path),
            remote: self.expand(&definition.remote),
            fetch: self.expand(&definition.fetch),
            revision: self.expand(&definition.revision),
            groups: self.expand(&definition.groups),
            children: Vec::new(),
        }
    }
}
