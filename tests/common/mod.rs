//! Shared test utilities

#![allow(dead_code)]

pub mod mock_repo;

pub use mock_platform::{CreatePrCall, EditPrCall, MockPlatformService, MockPr, pr_url};
pub use mock_repo::{MockRepository, RepoCall};

use gitdid::config::Config;
use gitdid::description::{DescriptionCodec, pr_title};
use gitdid::error::{Error, Result};
use gitdid::input::InputSource;
use gitdid::types::{PrLinkTable, PullRequestProps, TargetBranch};
use std::collections::VecDeque;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Answers prompts from a fixed script and remembers what was asked
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(ToString::to_string).collect(),
            prompts: Vec::new(),
        }
    }

    /// Input that must never be read
    pub fn empty() -> Self {
        Self::new(&[])
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::Input(format!("unexpected prompt: {prompt}")))
    }
}

/// Default config used by workflow tests
pub fn test_config() -> Config {
    Config::default()
}

/// Props entered in the standard scenario
pub fn widget_props() -> PullRequestProps {
    PullRequestProps {
        ticket_ids: ["AB-1", "AB-2"].into_iter().collect(),
        title: "Add widget".to_string(),
        summary: "Adds the widget.".to_string(),
    }
}

/// Answers matching [`widget_props`]
pub fn widget_answers() -> ScriptedInput {
    ScriptedInput::new(&["AB-1, AB-2", "Add widget", "Adds the widget."])
}

/// PR numbers of a seeded earlier run
pub struct SeededRun {
    pub production: MockPr,
    pub preprod: MockPr,
    pub develop: MockPr,
}

/// Seed the three PRs an earlier create run would have left behind
///
/// Companion PRs get the given states; bodies are fully cross-linked.
pub fn seed_previous_run(
    platform: &MockPlatformService,
    working: &str,
    preprod_state: &str,
    develop_state: &str,
) -> SeededRun {
    let props = widget_props();
    let title = |target| pr_title("AB-1", &props.title, target);

    let production = platform.add_pr(
        working,
        "production",
        &title(TargetBranch::Production),
        "",
        "OPEN",
    );
    let preprod = platform.add_pr(
        &format!("{working}-preprod"),
        "preprod",
        &title(TargetBranch::Preprod),
        "",
        preprod_state,
    );
    let develop = platform.add_pr(
        &format!("{working}-develop"),
        "develop",
        &title(TargetBranch::Develop),
        "",
        develop_state,
    );

    let mut links = PrLinkTable::new();
    links.insert(TargetBranch::Production, &production.url);
    links.insert(TargetBranch::Preprod, &preprod.url);
    links.insert(TargetBranch::Develop, &develop.url);

    let body = DescriptionCodec::new(&test_config().ticket_base_url)
        .render(&props, &links)
        .unwrap();
    for pr in [&production, &preprod, &develop] {
        platform.set_body(pr.number, &body);
    }

    SeededRun {
        production: platform.pr(production.number),
        preprod: platform.pr(preprod.number),
        develop: platform.pr(develop.number),
    }
}

/// Throwaway git repository with a `production` branch and one commit
pub struct TempGitRepo {
    pub dir: TempDir,
    /// Bare repository registered as `origin`
    pub remote: Option<TempDir>,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir, remote: None };
        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["checkout", "--quiet", "-b", "production"]);
        repo.commit_file("README.md", "base\n", "initial commit");
        repo
    }

    /// Repository with a bare `origin` holding `production`
    pub fn with_remote() -> Self {
        let mut repo = Self::new();
        let remote = TempDir::new().unwrap();
        run_git(remote.path(), &["init", "--quiet", "--bare"]);
        let url = remote.path().to_string_lossy().to_string();
        repo.git(&["remote", "add", "origin", &url]);
        repo.git(&["push", "--quiet", "--set-upstream", "origin", "production"]);
        repo.remote = Some(remote);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git inside the bare remote
    pub fn remote_git(&self, args: &[&str]) -> String {
        let remote = self.remote.as_ref().expect("repository has no remote");
        run_git(remote.path(), args)
    }

    /// Commit a branch points at on the remote, if it exists there
    pub fn remote_head(&self, branch: &str) -> Option<String> {
        let refname = format!("refs/heads/{branch}");
        let listing = self.remote_git(&["for-each-ref", "--format=%(objectname)", &refname]);
        (!listing.is_empty()).then_some(listing)
    }

    /// Run git in the repository, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        run_git(self.dir.path(), args)
    }

    /// Write a file and commit it on the current branch
    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
        self.git(&["add", name]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    /// Create and check out a branch from the current one
    pub fn branch(&self, name: &str) {
        self.git(&["checkout", "--quiet", "-b", name]);
    }

    pub fn checkout(&self, name: &str) {
        self.git(&["checkout", "--quiet", name]);
    }
}

impl Default for TempGitRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git in `dir`, panicking on failure
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
