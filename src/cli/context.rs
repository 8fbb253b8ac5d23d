//! Shared command context
//!
//! Opens the repository, loads configuration and makes sure `gh` is usable
//! before the workflow starts touching branches.

use crate::cli::style::{Stylize, check, spinner_style};
use gitdid::config::{Config, load_config};
use gitdid::error::{Error, Result};
use gitdid::platform::{GitHubCliService, PlatformService};
use gitdid::repo::GitRepository;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything a workflow run needs from the environment
pub struct CommandContext {
    /// The git repository
    pub repo: GitRepository,
    /// Root path of the working tree
    pub repo_root: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// PR hosting service
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context for the repository containing `path`
    pub async fn new(path: &Path) -> Result<Self> {
        let repo = GitRepository::open(path)?;
        let repo_root = repo.root().to_path_buf();

        let config = load_config(&repo_root)?;

        check_github_cli().await?;
        let platform = Box::new(GitHubCliService::new(&repo_root));

        Ok(Self {
            repo,
            repo_root,
            config,
            platform,
        })
    }
}

async fn check_github_cli() -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Checking GitHub CLI...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    if !GitHubCliService::is_installed().await {
        spinner.finish_and_clear();
        return Err(Error::Platform(
            "GitHub CLI (gh) is not installed".to_string(),
        ));
    }

    if !GitHubCliService::is_authenticated().await {
        spinner.finish_and_clear();
        return Err(Error::Platform(
            "Not authenticated with GitHub CLI (run 'gh auth login')".to_string(),
        ));
    }

    spinner.finish_with_message(format!("{} {}", check(), "GitHub CLI ready".muted()));
    Ok(())
}
