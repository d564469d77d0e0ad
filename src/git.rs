use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Clone a repository into `target_dir`.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone(url: &str, target_dir: &Path) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let output = Command::new("git")
        .args(["clone", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message,
        });
    }

    Ok(())
}

/// Check out `revision` in an existing working copy.
pub fn select_revision(working_dir: &Path, revision: &str) -> Result<()> {
    require_dir(working_dir)?;
    run(working_dir, &["checkout", revision]).map_err(|stderr| Error::GitCheckout {
        path: working_dir.to_path_buf(),
        revision: revision.to_string(),
        stderr,
    })?;
    Ok(())
}

/// Pull the currently checked out branch.
pub fn pull(working_dir: &Path) -> Result<()> {
    require_dir(working_dir)?;
    run(working_dir, &["pull"]).map_err(|stderr| Error::GitPull {
        path: working_dir.to_path_buf(),
        stderr,
    })?;
    Ok(())
}

/// Create `branch` at the current HEAD and switch to it.
pub fn create_and_switch_branch(working_dir: &Path, branch: &str) -> Result<()> {
    require_dir(working_dir)?;
    run(working_dir, &["checkout", "-b", branch]).map_err(|stderr| Error::GitBranch {
        path: working_dir.to_path_buf(),
        branch: branch.to_string(),
        stderr,
    })?;
    Ok(())
}

/// Name of the checked out branch, or the abbreviated commit when detached.
pub fn current_revision(working_dir: &Path) -> Result<String> {
    require_dir(working_dir)?;
    let command_error = |command: &str, stderr: String| Error::GitCommand {
        command: command.to_string(),
        path: working_dir.to_path_buf(),
        stderr,
    };

    let branch = run(working_dir, &["rev-parse", "--abbrev-ref", "HEAD"])
        .map_err(|stderr| command_error("rev-parse --abbrev-ref HEAD", stderr))?;
    if branch != "HEAD" {
        return Ok(branch);
    }

    run(working_dir, &["rev-parse", "--short", "HEAD"])
        .map_err(|stderr| command_error("rev-parse --short HEAD", stderr))
}

/// Whether `path` holds a git working copy.
pub fn is_working_copy(path: &Path) -> bool {
    path.join(".git").exists()
}

fn require_dir(working_dir: &Path) -> Result<()> {
    if working_dir.is_dir() {
        Ok(())
    } else {
        Err(Error::MissingWorkingCopy {
            path: working_dir.to_path_buf(),
        })
    }
}

/// Run git in `working_dir`, returning trimmed stdout or trimmed stderr.
fn run(working_dir: &Path, args: &[&str]) -> std::result::Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(working_dir)
        .output()
        .map_err(|e| e.to_string())?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}
