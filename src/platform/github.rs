//! GitHub platform service implementation backed by the `gh` CLI

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::PullRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Upper bound on PRs fetched by `list_open_prs`
const LIST_LIMIT: &str = "500";

/// Fields requested from `gh pr list --json`
const LIST_FIELDS: &str = "number,url,headRefName,baseRefName,title,body";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    url: String,
    head_ref_name: String,
    base_ref_name: String,
    title: String,
    #[serde(default)]
    body: String,
}

impl From<GhPullRequest> for PullRequest {
    fn from(pr: GhPullRequest) -> Self {
        Self {
            number: pr.number,
            url: pr.url,
            head_ref: pr.head_ref_name,
            base_ref: pr.base_ref_name,
            title: pr.title,
            body: pr.body,
        }
    }
}

/// Parse `gh pr list --json` output
fn parse_pr_list(json: &str) -> Result<Vec<PullRequest>> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let prs: Vec<GhPullRequest> = serde_json::from_str(trimmed)?;
    Ok(prs.into_iter().map(PullRequest::from).collect())
}

/// GitHub service running `gh` inside the repository
pub struct GitHubCliService {
    repo_root: PathBuf,
}

impl GitHubCliService {
    /// Create a service for the repository at `repo_root`
    pub fn new(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
        }
    }

    /// Whether `gh` is installed and on `PATH`
    pub async fn is_installed() -> bool {
        Command::new("gh")
            .arg("--version")
            .output()
            .await
            .is_ok_and(|o| o.status.success())
    }

    /// Whether `gh` has a logged-in account
    pub async fn is_authenticated() -> bool {
        Command::new("gh")
            .args(["auth", "status"])
            .output()
            .await
            .is_ok_and(|o| o.status.success())
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?&args[..args.len().min(3)], "running gh");
        Command::new("gh")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(|e| Error::Platform(format!("failed to run gh: {e}")))
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(Error::Platform(format!(
                "gh {} failed: {}",
                args[..args.len().min(2)].join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl PlatformService for GitHubCliService {
    async fn view_pr(&self, branch: &str) -> Result<Option<String>> {
        debug!(branch, "viewing PR");
        let output = self.output(&["pr", "view", branch]).await?;

        if !output.status.success() {
            debug!(
                branch,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "no PR for branch"
            );
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
    }

    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        debug!("listing open PRs");
        let stdout = self
            .run(&[
                "pr", "list", "--state", "open", "--limit", LIST_LIMIT, "--json", LIST_FIELDS,
            ])
            .await?;
        let prs = parse_pr_list(&stdout)?;
        debug!(count = prs.len(), "listed open PRs");
        Ok(prs)
    }

    async fn create_pr(&self, base: &str, head: &str, title: &str, body: &str) -> Result<String> {
        debug!(head, base, "creating PR");
        let stdout = self
            .run(&[
                "pr", "create", "--base", base, "--head", head, "--title", title, "--body", body,
            ])
            .await?;

        // gh prints progress lines before the URL
        let link = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| line.starts_with("http"))
            .ok_or_else(|| Error::Platform("PR created but no URL was returned".to_string()))?
            .to_string();

        debug!(%link, "created PR");
        Ok(link)
    }

    async fn edit_pr(&self, identifier: &str, body: &str) -> Result<()> {
        debug!(identifier, "editing PR body");
        self.run(&["pr", "edit", identifier, "--body", body]).await?;
        debug!(identifier, "edited PR body");
        Ok(())
    }
}
