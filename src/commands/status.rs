//! # Status Command Implementation
//!
//! This module implements the `status` subcommand, which reports the branch
//! (or detached commit) currently checked out in every project.
//!
//! Text output is one aligned line per project, with the branch coloured by the
//! first matching branch rule in the manifest. A project whose status cannot be
//! read is shown with its error inline instead of failing the whole command.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use pman::defaults::batch_jobs;
use pman::manifest::{Manifest, ResolvedProject};
use pman::output::OutputConfig;
use pman::repository::ProjectManager;

use super::ManifestArgs;

/// Output formats for `status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFormat {
    /// Aligned, coloured text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Show the current branch of each repository
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = StatusFormat::Text)]
    pub format: StatusFormat,

    /// Number of projects to query in parallel.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// One line of status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct StatusEntry {
    project: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StatusEntry {
    fn new(project: &ResolvedProject, outcome: pman::error::Result<String>) -> Self {
        match outcome {
            Ok(reference) => Self {
                project: project.name.clone(),
                reference: Some(reference),
                error: None,
            },
            Err(e) => Self {
                project: project.name.clone(),
                reference: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, output: &OutputConfig) -> Result<()> {
    let (manifest, projects) = args.manifest.resolve()?;
    let jobs = batch_jobs(args.jobs, manifest.sync_concurrency());

    let entries: Vec<StatusEntry> = projects
        .iter()
        .zip(ProjectManager::new().status_all(&projects, jobs))
        .map(|(project, outcome)| StatusEntry::new(project, outcome))
        .collect();

    match args.format {
        StatusFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        StatusFormat::Text => {
            for line in render_text(&entries, &manifest, output) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn render_text(entries: &[StatusEntry], manifest: &Manifest, output: &OutputConfig) -> Vec<String> {
    let width = entries
        .iter()
        .map(|entry| entry.project.chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let state = match (&entry.reference, &entry.error) {
                (Some(reference), _) => {
                    output.branch(reference, manifest.color_for_branch(reference))
                }
                (None, Some(error)) => output.error(error),
                (None, None) => String::new(),
            };
            format!("{:<width$} {}", entry.project, state, width = width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pman::error::Error;
    use std::path::PathBuf;

    fn project(name: &str) -> ResolvedProject {
        ResolvedProject {
            name: name.to_string(),
            path: PathBuf::from(format!("/work/{}", name)),
            remote: "origin".to_string(),
            fetch: format!("https://example.com/{}.git", name),
            revision: "main".to_string(),
            groups: vec![],
        }
    }

    #[test]
    fn test_render_text_aligns_columns() {
        let entries = vec![
            StatusEntry::new(&project("a"), Ok("main".to_string())),
            StatusEntry::new(&project("longer/name"), Ok("dev".to_string())),
        ];
        let lines = render_text(&entries, &Manifest::default(), &OutputConfig::without_color());

        assert_eq!(lines, vec!["a           main", "longer/name dev"]);
    }

    #[test]
    fn test_render_text_shows_errors_inline() {
        let failure = Error::MissingWorkingCopy {
            path: PathBuf::from("/work/gone"),
        };
        let entries = vec![StatusEntry::new(&project("gone"), Err(failure))];
        let lines = render_text(&entries, &Manifest::default(), &OutputConfig::without_color());

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("gone "));
        assert!(lines[0].contains("/work/gone"));
    }

    #[test]
    fn test_json_uses_ref_key() {
        let entries = vec![StatusEntry::new(&project("app"), Ok("main".to_string()))];
        let json = serde_json::to_value(&entries).unwrap();

        assert_eq!(json, serde_json::json!([{ "project": "app", "ref": "main" }]));
    }
}
