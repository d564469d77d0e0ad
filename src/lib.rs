//! # pman
//!
//! This library coordinates work across many independent git repositories
//! described by a single declarative manifest, in the spirit of Android's
//! `repo` tool. It is used by the `pman` command-line tool but can also be
//! embedded in other applications.
//!
//! ## Quick Example
//!
//! ```
//! use pman::env::Environment;
//! use pman::manifest::Manifest;
//! use pman::resolve::resolve;
//!
//! let manifest = Manifest::parse(r#"
//!     <manifest>
//!       <remote name="origin" fetch="https://git.example.com/org"/>
//!       <default revision="main"/>
//!       <project name="core"/>
//!       <project name="lib" fetch="libs/lib1"/>
//!     </manifest>
//! "#).unwrap();
//!
//! let projects = resolve(&manifest, &Environment::new());
//! assert_eq!(projects.len(), 2);
//! assert_eq!(projects[0].fetch, "https://git.example.com/org/core.git");
//! assert_eq!(projects[1].fetch, "https://git.example.com/org/libs/lib1.git");
//! assert_eq!(projects[1].revision, "main");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the parsed document: remotes, a default
//!   project template, a tree of project definitions and branch rules.
//! - **Resolution (`resolve`)**: merges every project definition with what it
//!   inherits from its ancestors and produces a flat list of fully populated
//!   projects.
//! - **Environment (`env`)**: `$VAR` expansion against an explicit snapshot,
//!   so resolution is deterministic.
//! - **Lifecycle (`repository`, `git`)**: sync, checkout-with-fallback and
//!   fork for resolved projects, run as batches that report every failure.

pub mod defaults;
pub mod env;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod path;
pub mod repository;
pub mod resolve;

#[cfg(test)]
mod path_proptest;
