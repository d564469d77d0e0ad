//! # Manifest Resolution
//!
//! Resolution expands the nested, partially specified project tree of a
//! [`Manifest`] into a flat list of [`ResolvedProject`]s with every field
//! populated.
//!
//! ## Algorithm
//!
//! The tree is walked depth first. Each definition is merged onto the
//! context inherited from its parent (the default template for top-level
//! projects):
//!
//! - `name` is the parent name joined with the node name.
//! - `revision` is inherited unless the node sets one.
//! - the remote is inherited unless the node names one; an unknown remote
//!   skips the node and its whole subtree with a warning.
//! - `fetch` starts from the inherited fetch, or the remote's fetch URL when
//!   nothing was inherited, and has the node's `fetch` (or its name) joined
//!   onto it. `path` is built the same way from the node's `path` or name.
//! - `groups` are the node's own groups; parent groups are not merged in.
//!
//! A node's resolved children are emitted **before** the node itself. A node
//! in the `notdefault` group is left out, but its children are not.
//!
//! Only the emitted copy of a project gets `~` expanded in its path and a
//! `.git` suffix on its fetch URL; children inherit the unexpanded values.
//!
//! Resolution is a pure function of the manifest and the [`Environment`]
//! snapshot: the same inputs always give the same output.

use std::path::PathBuf;

use log::{debug, error, warn};

use crate::env::Environment;
use crate::error::{Error, Result};
use crate::manifest::{Manifest, ProjectDefinition, Remote, RemoteTable, ResolvedProject};
use crate::path::{ensure_git_suffix, join_clean, url_join};

/// Resolve every project in `manifest` against `env`.
pub fn resolve(manifest: &Manifest, env: &Environment) -> Vec<ResolvedProject> {
    Resolver::new(manifest, env).resolve()
}

/// Walks a manifest's project tree. Holds the remote table so it is built once.
pub struct Resolver<'m> {
    manifest: &'m Manifest,
    env: &'m Environment,
    remotes: RemoteTable<'m>,
}

/// Values inherited by a node from its parent.
#[derive(Debug, Clone)]
struct Context<'m> {
    name: String,
    path: String,
    fetch: String,
    revision: String,
    /// Remote the fetch base is seeded from when nothing was inherited
    remote: &'m Remote,
    /// Remote name reported on resolved projects
    remote_name: String,
}

impl<'m> Context<'m> {
    fn expanded(&self, env: &Environment) -> Self {
        Self {
            name: env.expand(&self.name),
            path: env.expand(&self.path),
            fetch: env.expand(&self.fetch),
            revision: env.expand(&self.revision),
            remote: self.remote,
            remote_name: self.remote_name.clone(),
        }
    }
}

impl<'m> Resolver<'m> {
    pub fn new(manifest: &'m Manifest, env: &'m Environment) -> Self {
        Self {
            manifest,
            env,
            remotes: RemoteTable::new(&manifest.remotes),
        }
    }

    /// Resolve the whole manifest. Returns nothing when no remote is declared.
    pub fn resolve(&self) -> Vec<ResolvedProject> {
        let Some(root) = self.root_context() else {
            error!("{}", Error::NoRemotes);
            return Vec::new();
        };

        let mut projects = Vec::new();
        self.resolve_level(&self.manifest.projects, &root, &mut projects);
        projects
    }

    /// Top-level projects seed their fetch base from the first remote. A
    /// remote named on the default template only changes the reported name.
    fn root_context(&self) -> Option<Context<'m>> {
        let remote = self.remotes.default_remote()?;
        let default = &self.manifest.default;

        let remote_name = match self.env.expand(&default.remote) {
            name if name.is_empty() => remote.name.clone(),
            name if self.remotes.get(&name).is_some() => name,
            name => {
                warn!(
                    "{}; using {:?}",
                    Error::UnknownRemote {
                        project: "<default>".to_string(),
                        remote: name,
                    },
                    remote.name
                );
                remote.name.clone()
            }
        };

        Some(Context {
            name: default.name.clone(),
            path: default.path.clone(),
            fetch: default.fetch.clone(),
            revision: default.revision.clone(),
            remote,
            remote_name,
        })
    }

    fn resolve_level(
        &self,
        definitions: &[ProjectDefinition],
        parent: &Context<'m>,
        out: &mut Vec<ResolvedProject>,
    ) {
        let parent = parent.expanded(self.env);

        for definition in definitions {
            let node = self.env.expand_definition(definition);

            let remote = if node.remote.is_empty() {
                None
            } else if let Some(remote) = self.remotes.get(&node.remote) {
                Some(remote)
            } else {
                warn!(
                    "{}",
                    Error::UnknownRemote {
                        project: node.name.clone(),
                        remote: node.remote.clone(),
                    }
                );
                continue;
            };

            let context = match merge(&parent, &node, remote) {
                Ok(context) => context,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            if !definition.children.is_empty() {
                self.resolve_level(&definition.children, &context, out);
            }

            if node.is_not_default() {
                debug!("Skipping {}: in the notdefault group", context.name);
                continue;
            }

            out.push(self.materialize(context, &node));
        }
    }

    fn materialize(&self, context: Context<'m>, node: &ProjectDefinition) -> ResolvedProject {
        ResolvedProject {
            path: PathBuf::from(self.env.expand_home(&context.path)),
            fetch: ensure_git_suffix(&context.fetch),
            remote: context.remote_name,
            groups: node.group_names().map(String::from).collect(),
            name: context.name,
            revision: context.revision,
        }
    }
}

/// Merge an expanded node onto its parent's context. `remote` is the remote
/// the node names itself, if any.
fn merge<'m>(
    parent: &Context<'m>,
    node: &ProjectDefinition,
    remote: Option<&'m Remote>,
) -> Result<Context<'m>> {
    let name = join_clean(&parent.name, &node.name);
    let (remote, remote_name) = match remote {
        Some(remote) => (remote, remote.name.clone()),
        None => (parent.remote, parent.remote_name.clone()),
    };

    let revision = if node.revision.is_empty() {
        parent.revision.clone()
    } else {
        node.revision.clone()
    };

    let fetch_base = if parent.fetch.is_empty() {
        remote.fetch.as_str()
    } else {
        parent.fetch.as_str()
    };

    let fetch = url_join(fetch_base, or_name(&node.fetch, node)).map_err(|e| Error::Merge {
        project: name.clone(),
        message: e.to_string(),
    })?;
    let path = url_join(&parent.path, or_name(&node.path, node)).map_err(|e| Error::Merge {
        project: name.clone(),
        message: e.to_string(),
    })?;

    Ok(Context {
        name,
        path,
        fetch,
        revision,
        remote,
        remote_name,
    })
}

fn or_name<'a>(value: &'a str, node: &'a ProjectDefinition) -> &'a str {
    if value.is_empty() {
        &node.name
    } else {
        value
    }
}
