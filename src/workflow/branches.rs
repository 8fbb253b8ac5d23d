//! Branch operations - effectful, repository only
//!
//! Every function here leaves the working branch checked out when it returns,
//! whether it succeeded or not.

use crate::error::{Error, Result};
use crate::repo::{Repository, with_checkout_restored};
use crate::types::TargetBranch;
use crate::workflow::plan::probe_branch;
use tracing::{debug, info, warn};

/// How a companion branch is published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// Plain push; the remote branch must not have diverged
    Normal,
    /// Replace a stale remote branch left behind by a closed PR
    Replace,
}

/// Merge `branch` into the checked-out `onto`, aborting on conflict
fn merge_or_abort(repo: &dyn Repository, branch: &str, onto: &str) -> Result<()> {
    if let Err(e) = repo.merge_no_ff(branch) {
        debug!(branch, onto, error = %e, "merge failed");
        if let Err(abort_err) = repo.abort_merge() {
            warn!(error = %abort_err, "failed to abort merge");
        }
        return Err(Error::MergeConflict {
            target: branch.to_string(),
            branch: onto.to_string(),
        });
    }
    Ok(())
}

fn delete_if_exists(repo: &dyn Repository, branch: &str) -> Result<()> {
    if repo.branch_exists(branch)? {
        repo.delete_branch(branch)?;
    }
    Ok(())
}

/// Test-merge one target into a throwaway copy of the working branch
///
/// The probe branch is gone afterwards in every case.
pub fn check_target_merges_cleanly(
    repo: &dyn Repository,
    remote: &str,
    working_branch: &str,
    target: TargetBranch,
) -> Result<()> {
    let probe = probe_branch(working_branch, target);
    delete_if_exists(repo, &probe)?;

    let merged = with_checkout_restored(repo, working_branch, |repo| {
        repo.checkout(target.branch_name())?;
        repo.pull(remote, target.branch_name())?;
        repo.create_branch(&probe, working_branch)?;
        merge_or_abort(repo, target.branch_name(), working_branch)
    });

    let cleanup = delete_if_exists(repo, &probe);
    merged?;
    cleanup?;

    debug!(%target, "merges cleanly");
    Ok(())
}

/// Build a companion branch from the latest target and publish it
///
/// The companion is cut from the working branch, then the target is merged in.
pub fn create_companion(
    repo: &dyn Repository,
    remote: &str,
    working_branch: &str,
    target: TargetBranch,
    push_mode: PushMode,
) -> Result<String> {
    let companion = target.companion_of(working_branch).ok_or_else(|| {
        Error::Internal(format!("{target} has no companion branch"))
    })?;

    with_checkout_restored(repo, working_branch, |repo| {
        repo.checkout(target.branch_name())?;
        repo.pull(remote, target.branch_name())?;
        repo.create_branch(&companion, working_branch)?;
        merge_or_abort(repo, target.branch_name(), &companion)?;
        match push_mode {
            PushMode::Normal => repo.push(remote, &companion),
            PushMode::Replace => repo.force_push(remote, &companion),
        }
    })?;

    info!(%companion, %target, "created companion branch");
    Ok(companion)
}

/// Merge the working branch into an existing companion and push it
pub fn sync_companion(
    repo: &dyn Repository,
    remote: &str,
    working_branch: &str,
    companion: &str,
) -> Result<()> {
    with_checkout_restored(repo, working_branch, |repo| {
        repo.checkout(companion)?;
        merge_or_abort(repo, working_branch, companion)?;
        repo.push(remote, companion)
    })?;

    info!(companion, "synced companion branch");
    Ok(())
}

/// Delete a local companion branch left over from a closed PR
pub fn remove_stale_companion(repo: &dyn Repository, companion: &str) -> Result<()> {
    debug!(companion, "removing stale companion branch if present");
    delete_if_exists(repo, companion)
}
