//! Core types for gitdid

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the fixed deployment-stage branches every change must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetBranch {
    /// The production branch; feature branches are cut from it
    Production,
    /// The develop branch
    Develop,
    /// The preprod branch
    Preprod,
}

impl TargetBranch {
    /// Targets that get a companion branch, in creation order
    pub const COMPANIONS: [Self; 2] = [Self::Develop, Self::Preprod];

    /// Order in which PRs are opened and listed in descriptions
    pub const PR_ORDER: [Self; 3] = [Self::Production, Self::Preprod, Self::Develop];

    /// Branch name in the repository
    pub const fn branch_name(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Develop => "develop",
            Self::Preprod => "preprod",
        }
    }

    /// Capitalized label used in the Related Pull Requests section
    pub const fn label(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Develop => "Develop",
            Self::Preprod => "Preprod",
        }
    }

    /// Look a target up by its capitalized label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::PR_ORDER.into_iter().find(|t| t.label() == label)
    }

    /// Companion branch for this target, `None` for production
    pub fn companion_of(self, working_branch: &str) -> Option<String> {
        match self {
            Self::Production => None,
            Self::Develop | Self::Preprod => {
                Some(format!("{working_branch}-{}", self.branch_name()))
            }
        }
    }

    /// Head branch of this target's PR
    pub fn head_branch(self, working_branch: &str) -> String {
        self.companion_of(working_branch)
            .unwrap_or_else(|| working_branch.to_string())
    }
}

impl std::fmt::Display for TargetBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.branch_name())
    }
}

/// Ticket IDs in entry order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketIds(Vec<String>);

impl TicketIds {
    /// Create an empty list
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a ticket ID unless it is already present
    ///
    /// Returns `true` if the ID was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// The first ticket ID, used in PR titles
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterate over ticket IDs in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of ticket IDs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no ticket IDs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TicketIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = Self::new();
        for id in iter {
            ids.insert(id);
        }
        ids
    }
}

/// Fields shared by the three linked pull requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestProps {
    /// Ticket IDs, the first one prefixes every PR title
    pub ticket_ids: TicketIds,
    /// PR title without ticket prefix and target suffix
    pub title: String,
    /// Free-text summary
    pub summary: String,
}

/// PR links recorded per target during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrLinkTable(BTreeMap<TargetBranch, String>);

impl PrLinkTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record the link for a target, replacing any previous one
    pub fn insert(&mut self, target: TargetBranch, link: impl Into<String>) -> Option<String> {
        self.0.insert(target, link.into())
    }

    /// Link for a target
    pub fn get(&self, target: TargetBranch) -> Option<&str> {
        self.0.get(&target).map(String::as_str)
    }

    /// Whether a link is recorded for a target
    pub fn contains(&self, target: TargetBranch) -> bool {
        self.0.contains_key(&target)
    }

    /// Links in PR order
    pub fn iter(&self) -> impl Iterator<Item = (TargetBranch, &str)> {
        TargetBranch::PR_ORDER
            .into_iter()
            .filter_map(|t| self.get(t).map(|link| (t, link)))
    }

    /// Number of recorded links
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no link is recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An open pull request as listed by the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub url: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
}

/// Which flow a run executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    /// First run: companion branches and PRs were created
    Create,
    /// Subsequent run: companions were brought up to date
    Update,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Summary of what a run did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Flow that was executed
    pub flow: Flow,
    /// Working branch the run started from
    pub working_branch: String,
    /// PR links at the end of the run
    pub links: PrLinkTable,
    /// Targets whose PR was opened during this run
    pub created_prs: Vec<TargetBranch>,
    /// Companions that received the working branch via merge and push
    pub synced_companions: Vec<TargetBranch>,
    /// Companions that were deleted and rebuilt because their PR had closed
    pub recreated_companions: Vec<TargetBranch>,
    /// PR identifiers whose description rewrite failed
    pub failed_rewrites: Vec<String>,
}

impl RunReport {
    pub(crate) const fn new(flow: Flow, working_branch: String) -> Self {
        Self {
            flow,
            working_branch,
            links: PrLinkTable::new(),
            created_prs: Vec::new(),
            synced_companions: Vec::new(),
            recreated_companions: Vec::new(),
            failed_rewrites: Vec::new(),
        }
    }
}
