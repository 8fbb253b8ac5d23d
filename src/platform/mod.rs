//! Pull request hosting gateway
//!
//! Provides the PR operations the workflow needs behind one trait.

mod github;

pub use github::GitHubCliService;

use crate::error::Result;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// "No PR found" is an ordinary answer, never an error.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Plain-text view of the PR whose head is `branch`
    ///
    /// The text is `key:\tvalue` metadata lines, a `--` line, then the body.
    /// Returns `None` if the branch has no PR.
    async fn view_pr(&self, branch: &str) -> Result<Option<String>>;

    /// All open PRs in the repository
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>>;

    /// Open a PR and return its link
    async fn create_pr(&self, base: &str, head: &str, title: &str, body: &str) -> Result<String>;

    /// Replace the body of a PR identified by number or link
    async fn edit_pr(&self, identifier: &str, body: &str) -> Result<()>;
}
