//! # Manifest Data Model and Parsing
//!
//! A manifest describes a tree of projects, the named remotes their fetch URLs
//! are built from, a default project template that seeds inheritance, and
//! optional branch rules used to colour status output.
//!
//! ## Document format
//!
//! Manifests are XML documents:
//!
//! ```xml
//! <manifest>
//!   <remote name="origin" fetch="https://git.example.com/org" sync-j="4"/>
//!   <default revision="main" path="~/src"/>
//!   <project name="core"/>
//!   <project name="libs" revision="develop">
//!     <project name="lib1" fetch="libs/lib1" groups="notdefault"/>
//!   </project>
//!   <branch-config>
//!     <branch-rule name="main" color="green"/>
//!     <branch-rule name="release" color="yellow" prefixes="release/, hotfix/"/>
//!   </branch-config>
//! </manifest>
//! ```
//!
//! Every attribute is optional. A missing attribute means "inherit from the
//! parent project or the default template" and is never an error. Unknown
//! elements and attributes are ignored.
//!
//! The parsed [`Manifest`] is read-only input for [`crate::resolve`], which
//! turns it into a flat list of [`ResolvedProject`]s.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

/// Group name that excludes a project from resolution output.
pub const NOT_DEFAULT_GROUP: &str = "notdefault";

/// A named template for building fetch URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Remote {
    /// Unique name of the remote
    pub name: String,
    /// Base fetch URL that project fetch components are joined onto
    pub fetch: String,
    /// Suggested number of parallel jobs when syncing (0 means no hint)
    pub sync_concurrency: usize,
}

/// Maps branch names to a display colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchRule {
    pub name: String,
    /// A `console` dotted style string, e.g. `green` or `yellow.bold`
    pub color: String,
    pub prefixes: Vec<String>,
}

impl BranchRule {
    /// A branch matches when it equals the rule name or starts with any of
    /// the rule's prefixes.
    pub fn matches(&self, branch: &str) -> bool {
        branch == self.name
            || self
                .prefixes
                .iter()
                .map(|prefix| prefix.trim())
                .any(|prefix| !prefix.is_empty() && branch.starts_with(prefix))
    }
}

/// A project as authored in the manifest.
///
/// Empty fields mean "inherit". `groups` is the raw space-separated group
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDefinition {
    pub name: String,
    pub path: String,
    pub remote: String,
    pub fetch: String,
    pub revision: String,
    pub groups: String,
    pub children: Vec<ProjectDefinition>,
}

impl ProjectDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_fetch(mut self, fetch: impl Into<String>) -> Self {
        self.fetch = fetch.into();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_groups(mut self, groups: impl Into<String>) -> Self {
        self.groups = groups.into();
        self
    }

    pub fn with_children(mut self, children: Vec<ProjectDefinition>) -> Self {
        self.children = children;
        self
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.split_whitespace()
    }

    /// Whether this definition is tagged with the `notdefault` group.
    pub fn is_not_default(&self) -> bool {
        self.group_names().any(|group| group == NOT_DEFAULT_GROUP)
    }
}

/// A fully merged project, ready for version-control operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProject {
    /// Slash-joined names of every ancestor and the project itself
    pub name: String,
    /// Local checkout path, with `~` expanded
    pub path: PathBuf,
    /// Name of the remote in effect for this project
    pub remote: String,
    /// Absolute fetch URL, always ending in `.git`
    pub fetch: String,
    pub revision: String,
    pub groups: Vec<String>,
}

/// The parsed manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub remotes: Vec<Remote>,
    /// Inheritance context for top-level projects
    pub default: ProjectDefinition,
    pub projects: Vec<ProjectDefinition>,
    pub branch_rules: Vec<BranchRule>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::ManifestParse { message, hint } => Error::ManifestParse {
                message: format!("{}: {}", path.display(), message),
                hint,
            },
            other => other,
        })
    }

    /// Parse a manifest from an XML string.
    pub fn parse(input: &str) -> Result<Self> {
        let mut xot = Xot::new();
        let root = xot.parse(input).map_err(|e| Error::ManifestParse {
            message: e.to_string(),
            hint: None,
        })?;
        let document = xot
            .document_element(root)
            .map_err(|e| Error::ManifestParse {
                message: e.to_string(),
                hint: None,
            })?;

        let names = Names::register(&mut xot);
        let parser = Parser { xot: &xot, names };
        parser.manifest(document)
    }

    /// The first declared remote, used when no project names one.
    pub fn default_remote(&self) -> Option<&Remote> {
        self.remotes.first()
    }

    /// Parallelism hint from the default remote's `sync-j`, if set.
    pub fn sync_concurrency(&self) -> Option<usize> {
        self.default_remote()
            .map(|remote| remote.sync_concurrency)
            .filter(|jobs| *jobs > 0)
    }

    /// Colour of the first branch rule matching `branch`.
    pub fn color_for_branch(&self, branch: &str) -> Option<&str> {
        self.branch_rules
            .iter()
            .find(|rule| rule.matches(branch))
            .map(|rule| rule.color.as_str())
    }
}

/// Exact-match lookup from remote name to remote, built once per resolution.
#[derive(Debug)]
pub struct RemoteTable<'m> {
    by_name: HashMap<&'m str, &'m Remote>,
    default: Option<&'m Remote>,
}

impl<'m> RemoteTable<'m> {
    pub fn new(remotes: &'m [Remote]) -> Self {
        let mut by_name = HashMap::with_capacity(remotes.len());
        for remote in remotes {
            by_name.entry(remote.name.as_str()).or_insert(remote);
        }
        Self {
            by_name,
            default: remotes.first(),
        }
    }

    /// Look up a remote by exact name. The first declaration wins.
    pub fn get(&self, name: &str) -> Option<&'m Remote> {
        self.by_name.get(name).copied()
    }

    /// The first declared remote.
    pub fn default_remote(&self) -> Option<&'m Remote> {
        self.default
    }
}

/// Interned element and attribute names.
struct Names {
    remote: NameId,
    default: NameId,
    project: NameId,
    branch_config: NameId,
    branch_rule: NameId,
    name: NameId,
    fetch: NameId,
    sync_j: NameId,
    path: NameId,
    revision: NameId,
    groups: NameId,
    color: NameId,
    prefixes: NameId,
}

impl Names {
    fn register(xot: &mut Xot) -> Self {
        Self {
            remote: xot.add_name("remote"),
            default: xot.add_name("default"),
            project: xot.add_name("project"),
            branch_config: xot.add_name("branch-config"),
            branch_rule: xot.add_name("branch-rule"),
            name: xot.add_name("name"),
            fetch: xot.add_name("fetch"),
            sync_j: xot.add_name("sync-j"),
            path: xot.add_name("path"),
            revision: xot.add_name("revision"),
            groups: xot.add_name("groups"),
            color: xot.add_name("color"),
            prefixes: xot.add_name("prefixes"),
        }
    }
}

struct Parser<'x> {
    xot: &'x Xot,
    names: Names,
}

impl Parser<'_> {
    fn manifest(&self, document: Node) -> Result<Manifest> {
        let mut manifest = Manifest::default();

        for child in self.elements(document) {
            let name = self.element_name(child);
            if name == Some(self.names.remote) {
                manifest.remotes.push(self.remote(child)?);
            } else if name == Some(self.names.default) {
                manifest.default = self.project_fields(child);
            } else if name == Some(self.names.project) {
                manifest.projects.push(self.project(child));
            } else if name == Some(self.names.branch_config) {
                for rule in self.elements(child) {
                    if self.element_name(rule) == Some(self.names.branch_rule) {
                        manifest.branch_rules.push(self.branch_rule(rule));
                    }
                }
            }
        }

        Ok(manifest)
    }

    fn remote(&self, node: Node) -> Result<Remote> {
        let name = self.attr(node, self.names.name);
        let sync_j = self.attr(node, self.names.sync_j);
        let sync_concurrency = match sync_j.trim() {
            "" => 0,
            value => value.parse::<usize>().map_err(|_| Error::ManifestParse {
                message: format!("remote {:?}: invalid sync-j value {:?}", name, value),
                hint: Some("sync-j must be a non-negative whole number".to_string()),
            })?,
        };

        Ok(Remote {
            fetch: self.attr(node, self.names.fetch),
            name,
            sync_concurrency,
        })
    }

    fn project(&self, node: Node) -> ProjectDefinition {
        let mut project = self.project_fields(node);
        project.children = self
            .elements(node)
            .filter(|child| self.element_name(*child) == Some(self.names.project))
            .map(|child| self.project(child))
            .collect();
        project
    }

    fn project_fields(&self, node: Node) -> ProjectDefinition {
        ProjectDefinition {
            name: self.attr(node, self.names.name),
            path: self.attr(node, self.names.path),
            remote: self.attr(node, self.names.remote),
            fetch: self.attr(node, self.names.fetch),
            revision: self.attr(node, self.names.revision),
            groups: self.attr(node, self.names.groups),
            children: Vec::new(),
        }
    }

    fn branch_rule(&self, node: Node) -> BranchRule {
        BranchRule {
            name: self.attr(node, self.names.name),
            color: self.attr(node, self.names.color),
            prefixes: self
                .attr(node, self.names.prefixes)
                .split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    fn elements(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.xot
            .children(node)
            .filter(move |child| self.xot.element(*child).is_some())
    }

    fn element_name(&self, node: Node) -> Option<NameId> {
        self.xot.element(node).map(|element| element.name())
    }

    fn attr(&self, node: Node, name: NameId) -> String {
        self.xot
            .get_attribute(node, name)
            .unwrap_or_default()
            .to_string()
    }
}
