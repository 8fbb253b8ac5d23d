//! Workflow decisions - pure functions
//!
//! No I/O happens here. The engine gathers gateway answers first and asks
//! these functions what to do with them.

use crate::description::pr_state;
use crate::error::{Error, Result};
use crate::types::{Flow, PullRequest, TargetBranch};

/// What to do with one companion branch during an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionAction {
    /// Its PR is still open: merge the working branch in and push
    Sync {
        /// Target the companion belongs to
        target: TargetBranch,
        /// Companion branch name
        branch: String,
    },
    /// Its PR closed: rebuild the branch from the target and open a new PR
    Recreate {
        /// Target the companion belongs to
        target: TargetBranch,
        /// Companion branch name
        branch: String,
    },
}

impl CompanionAction {
    /// Target of this action
    pub const fn target(&self) -> TargetBranch {
        match self {
            Self::Sync { target, .. } | Self::Recreate { target, .. } => *target,
        }
    }

    /// Companion branch of this action
    pub fn branch(&self) -> &str {
        match self {
            Self::Sync { branch, .. } | Self::Recreate { branch, .. } => branch,
        }
    }
}

impl std::fmt::Display for CompanionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync { branch, .. } => write!(f, "sync {branch}"),
            Self::Recreate { branch, target } => write!(f, "recreate {branch} from {target}"),
        }
    }
}

/// Reject branches the workflow must not start from
///
/// Target branches, companion branches and a detached HEAD are refused.
pub fn validate_working_branch(branch: &str) -> Result<()> {
    let reject = |reason: String| {
        Err(Error::WrongBranch {
            branch: branch.to_string(),
            reason,
        })
    };

    if branch.trim().is_empty() || branch == "HEAD" {
        return reject("no branch is checked out; check out your feature branch".to_string());
    }

    if let Some(target) = TargetBranch::PR_ORDER
        .into_iter()
        .find(|t| branch == t.branch_name())
    {
        return reject(format!(
            "'{target}' is a target branch; check out your feature branch"
        ));
    }

    if let Some(target) = TargetBranch::COMPANIONS
        .into_iter()
        .find(|t| branch.ends_with(&format!("-{}", t.branch_name())))
    {
        return reject(format!(
            "this looks like the {target} companion branch; run from the original feature branch"
        ));
    }

    Ok(())
}

/// Name of the throwaway branch used to test-merge `target`
pub fn probe_branch(working_branch: &str, target: TargetBranch) -> String {
    format!("{working_branch}-conflict-check-{target}")
}

/// Pick the flow from the working branch's PR view, if any
///
/// A PR that is known not to be open counts as no PR.
pub fn decide_flow(production_view: Option<&str>) -> Flow {
    match production_view {
        Some(text) => match pr_state(text) {
            Some(state) if state != "OPEN" => Flow::Create,
            _ => Flow::Update,
        },
        None => Flow::Create,
    }
}

/// Decide, per companion, whether to sync it or rebuild it
///
/// Returns actions in companion creation order (develop, then preprod).
pub fn plan_companion_sync(working_branch: &str, open_prs: &[PullRequest]) -> Vec<CompanionAction> {
    TargetBranch::COMPANIONS
        .into_iter()
        .filter_map(|target| {
            let branch = target.companion_of(working_branch)?;
            let has_open_pr = open_prs
                .iter()
                .any(|pr| pr.head_ref == branch && pr.base_ref == target.branch_name());
            Some(if has_open_pr {
                CompanionAction::Sync { target, branch }
            } else {
                CompanionAction::Recreate { target, branch }
            })
        })
        .collect()
}

/// Open PRs whose head is the working branch or one of its companions
pub fn prs_for_working_branch<'a>(
    working_branch: &str,
    open_prs: &'a [PullRequest],
) -> Vec<&'a PullRequest> {
    let heads: Vec<String> = TargetBranch::PR_ORDER
        .into_iter()
        .map(|t| t.head_branch(working_branch))
        .collect();
    open_prs
        .iter()
        .filter(|pr| heads.contains(&pr.head_ref))
        .collect()
}

/// Find the open PR for a target's head/base pair
pub fn open_pr_for<'a>(
    working_branch: &str,
    target: TargetBranch,
    open_prs: &'a [PullRequest],
) -> Option<&'a PullRequest> {
    let head = target.head_branch(working_branch);
    open_prs
        .iter()
        .find(|pr| pr.head_ref == head && pr.base_ref == target.branch_name())
}
