//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifest
//! snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::SIMPLE);
//!     fixture.command().arg("dump-projects").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One remote, two top-level projects, one nested group.
    pub const SIMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest>
  <remote name="origin" fetch="https://git.example.com/org"/>
  <default revision="main" path="/work"/>
  <project name="core"/>
  <project name="libs" revision="develop" groups="notdefault">
    <project name="lib1" groups="tools"/>
  </project>
</manifest>
"#;

    /// Projects but no remotes at all.
    pub const NO_REMOTES: &str = r#"<manifest>
  <project name="orphan"/>
</manifest>
"#;

    /// Not XML.
    pub const MALFORMED: &str = "<manifest><remote name=\"origin\"";
}

/// A test fixture that provides a temporary directory with an optional
/// `pman.xml` manifest.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(manifests::SIMPLE)
///     .with_file("core/README.md", "not a git repository");
///
/// fixture.command().arg("sync").assert().failure();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `pman.xml` manifest with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file("pman.xml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest file.
    #[allow(dead_code)]
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("pman.xml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// Environment variables that change manifest discovery or logging are
    /// cleared so the host environment cannot leak into the test.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pman");
        cmd.current_dir(self.path())
            .env_remove("PMAN_MANIFEST")
            .env_remove("LOGLEVEL")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `git` with a fixed identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=pman tests", "-c", "user.email=pman@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a bare repository `<remotes>/<name>.git` whose `main` branch holds one
/// commit, plus any extra `branches` pointing at the same commit.
#[allow(dead_code)]
pub fn create_remote_repo(remotes: &Path, name: &str, branches: &[&str]) -> PathBuf {
    let bare = remotes.join(format!("{}.git", name));
    let seed = remotes.join(format!("{}-seed", name));
    std::fs::create_dir_all(&seed).expect("Failed to create seed directory");

    git(&seed, &["init", "-q", "-b", "main"]);
    std::fs::write(seed.join("README.md"), name).expect("Failed to write seed file");
    git(&seed, &["add", "README.md"]);
    git(&seed, &["commit", "-q", "-m", "initial commit"]);
    for branch in branches {
        git(&seed, &["branch", branch]);
    }

    let bare_arg = bare.to_string_lossy().to_string();
    git(remotes, &["clone", "-q", "--bare", &seed.to_string_lossy(), &bare_arg]);
    bare
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::SIMPLE);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifests_parse() {
        for manifest in [manifests::SIMPLE, manifests::NO_REMOTES] {
            pman::manifest::Manifest::parse(manifest).expect("Manifest should parse");
        }
        assert!(pman::manifest::Manifest::parse(manifests::MALFORMED).is_err());
    }
}
