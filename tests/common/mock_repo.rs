//! In-memory repository for workflow tests

#![allow(dead_code)]

use gitdid::error::{Error, Result};
use gitdid::repo::Repository;
use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

/// Call record for every repository operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    CurrentBranch,
    Checkout(String),
    Pull { remote: String, branch: String },
    CreateBranch { name: String, from: String },
    MergeNoFf(String),
    AbortMerge,
    Push { remote: String, branch: String },
    ForcePush { remote: String, branch: String },
    DeleteBranch(String),
    BranchExists(String),
}

impl RepoCall {
    /// Whether the call changes the repository or the remote
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::CurrentBranch | Self::BranchExists(_))
    }
}

struct RepoState {
    current: String,
    branches: BTreeSet<String>,
    merging: bool,
}

/// Repository double with branch bookkeeping
///
/// Behaves like git where the workflow depends on it:
/// - creating an existing branch fails
/// - checking out or deleting a missing branch fails
/// - the checked-out branch cannot be deleted
/// - nothing can be checked out while a merge is in progress
pub struct MockRepository {
    state: Mutex<RepoState>,
    calls: Mutex<Vec<RepoCall>>,
    conflicting: Mutex<HashSet<String>>,
    error_on_push: Mutex<Option<String>>,
}

impl MockRepository {
    /// Repository with the three target branches and `current` checked out
    pub fn new(current: &str) -> Self {
        let branches = ["production", "develop", "preprod", current]
            .into_iter()
            .map(ToString::to_string)
            .collect();
        Self {
            state: Mutex::new(RepoState {
                current: current.to_string(),
                branches,
                merging: false,
            }),
            calls: Mutex::new(Vec::new()),
            conflicting: Mutex::new(HashSet::new()),
            error_on_push: Mutex::new(None),
        }
    }

    /// Add local branches
    pub fn with_branches(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for name in names {
                state.branches.insert((*name).to_string());
            }
        }
        self
    }

    // === Error injection ===

    /// Merging `branch` into anything conflicts
    pub fn conflict_on_merge_of(&self, branch: &str) {
        self.conflicting.lock().unwrap().insert(branch.to_string());
    }

    /// Make `push` and `force_push` fail
    pub fn fail_push(&self, msg: &str) {
        *self.error_on_push.lock().unwrap() = Some(msg.to_string());
    }

    // === Inspection ===

    pub fn current(&self) -> String {
        self.state.lock().unwrap().current.clone()
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.state.lock().unwrap().branches.contains(name)
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<RepoCall> {
        self.calls()
            .into_iter()
            .filter(RepoCall::is_mutating)
            .collect()
    }

    /// Names of created branches, in order
    pub fn created_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::CreateBranch { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Created branches that are not conflict-check probes
    pub fn created_companions(&self) -> Vec<String> {
        self.created_branches()
            .into_iter()
            .filter(|name| !name.contains("-conflict-check-"))
            .collect()
    }

    /// Branches pushed, plain or forced, in order
    pub fn pushed_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::Push { branch, .. } | RepoCall::ForcePush { branch, .. } => Some(branch),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn git_err(msg: impl Into<String>) -> Error {
    Error::Git(msg.into())
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        self.record(RepoCall::CurrentBranch);
        Ok(self.current())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(RepoCall::Checkout(branch.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.merging {
            return Err(git_err("you need to resolve your current index first"));
        }
        if !state.branches.contains(branch) {
            return Err(git_err(format!("pathspec '{branch}' did not match")));
        }
        state.current = branch.to_string();
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(RepoCall::Pull {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }

    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        self.record(RepoCall::CreateBranch {
            name: name.to_string(),
            from: from_ref.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if state.branches.contains(name) {
            return Err(git_err(format!("a branch named '{name}' already exists")));
        }
        if !state.branches.contains(from_ref) {
            return Err(git_err(format!("'{from_ref}' is not a commit")));
        }
        state.branches.insert(name.to_string());
        state.current = name.to_string();
        Ok(())
    }

    fn merge_no_ff(&self, branch: &str) -> Result<()> {
        self.record(RepoCall::MergeNoFf(branch.to_string()));
        if self.conflicting.lock().unwrap().contains(branch) {
            self.state.lock().unwrap().merging = true;
            return Err(git_err("CONFLICT (content): Merge conflict in src/lib.rs"));
        }
        Ok(())
    }

    fn abort_merge(&self) -> Result<()> {
        self.record(RepoCall::AbortMerge);
        let mut state = self.state.lock().unwrap();
        if !state.merging {
            return Err(git_err("There is no merge to abort"));
        }
        state.merging = false;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(RepoCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        match self.error_on_push.lock().unwrap().as_ref() {
            Some(msg) => Err(git_err(msg.clone())),
            None => Ok(()),
        }
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(RepoCall::ForcePush {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        match self.error_on_push.lock().unwrap().as_ref() {
            Some(msg) => Err(git_err(msg.clone())),
            None => Ok(()),
        }
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(RepoCall::DeleteBranch(name.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.current == name {
            return Err(git_err(format!("cannot delete branch '{name}' checked out")));
        }
        if !state.branches.remove(name) {
            return Err(git_err(format!("branch '{name}' not found")));
        }
        Ok(())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        self.record(RepoCall::BranchExists(name.to_string()));
        Ok(self.has_branch(name))
    }
}
