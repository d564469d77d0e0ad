//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the project
//! definitions of the manifest in their nested form, before any inheritance
//! is applied.
//!
//! ## Functionality
//!
//! - **Project Tree Visualization**: Displays the nesting of project definitions
//! - **Depth Control**: Supports `--depth` flag to limit tree depth
//! - **Attribute Display**: Shows the attributes each definition sets itself
//!
//! This command is a safe, read-only operation that does not touch any working copy.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use pman::manifest::ProjectDefinition;
use pman::output::{emoji, OutputConfig};

use super::ManifestArgs;

/// Display the manifest project tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only top-level projects, 1 to show one level of nesting, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, output: &OutputConfig) -> Result<()> {
    let manifest = args.manifest.load()?;

    let max_depth = args.depth.unwrap_or(usize::MAX);
    let tree_root = TreeNode {
        label: format!("{} Manifest projects", emoji(output, "🌳", "[tree]")),
        children: manifest
            .projects
            .iter()
            .map(|project| build_tree_node(project, max_depth, 0))
            .collect(),
    };
    print_tree(&tree_root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Build a tree node from a project definition
fn build_tree_node(project: &ProjectDefinition, max_depth: usize, current_depth: usize) -> TreeNode {
    let label = describe(project);

    if current_depth >= max_depth || project.children.is_empty() {
        TreeNode {
            label,
            children: vec![],
        }
    } else {
        let children = project
            .children
            .iter()
            .map(|child| build_tree_node(child, max_depth, current_depth + 1))
            .collect();
        TreeNode { label, children }
    }
}

fn describe(project: &ProjectDefinition) -> String {
    let attributes: Vec<String> = [
        ("path", &project.path),
        ("remote", &project.remote),
        ("fetch", &project.fetch),
        ("revision", &project.revision),
        ("groups", &project.groups),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(key, value)| format!("{}={}", key, value))
    .collect();

    if attributes.is_empty() {
        project.name.clone()
    } else {
        format!("{} [{}]", project.name, attributes.join(", "))
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
