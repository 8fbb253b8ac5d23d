//! `git` command-line implementation of the repository gateway

use crate::error::{Error, Result};
use crate::repo::Repository;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Repository backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "{} is not inside a git repository: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root })
    }

    /// Root directory of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Git(format!("failed to run git {}: {e}", args.join(" "))))
    }

    /// Run git and fail with its stderr on a non-zero exit
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // merge reports conflicts on stdout
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::Git(format!("git {} failed: {detail}", args.join(" "))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Commit `branch` points at on `remote`, `None` if it does not exist there
    fn remote_head(&self, remote: &str, branch: &str) -> Result<Option<String>> {
        let refname = format!("refs/heads/{branch}");
        let listing = self.run(&["ls-remote", "--heads", remote, &refname])?;
        Ok(listing
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .find(|(_, name)| *name == refname)
            .map(|(sha, _)| sha.to_string()))
    }
}

impl Repository for GitRepository {
    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(drop)
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["pull", "--no-rebase", "--no-edit", remote, branch])
            .map(drop)
    }

    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        self.run(&["checkout", "-b", name, from_ref]).map(drop)
    }

    fn merge_no_ff(&self, branch: &str) -> Result<()> {
        self.run(&["merge", "--no-ff", "--no-edit", branch]).map(drop)
    }

    fn abort_merge(&self) -> Result<()> {
        self.run(&["merge", "--abort"]).map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "--set-upstream", remote, branch])
            .map(drop)
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        // Lease on what the remote holds now, not on the tracking ref, which
        // goes stale once the host deletes a merged PR's branch.
        let expected = self.remote_head(remote, branch)?.unwrap_or_default();
        debug!(branch, expected = %expected, "replacing remote branch");
        let lease = format!("--force-with-lease={branch}:{expected}");
        self.run(&["push", &lease, "--set-upstream", remote, branch])
            .map(drop)
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", "-D", name]).map(drop)
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        let refname = format!("refs/heads/{name}");
        let output = self.output(&["show-ref", "--verify", "--quiet", &refname])?;
        Ok(output.status.success())
    }
}
