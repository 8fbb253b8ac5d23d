//! Repository gateway
//!
//! The workflow only sees the [`Repository`] trait. [`GitRepository`] implements
//! it by running `git` in the repository root.

mod git;

pub use git::GitRepository;

use crate::error::Result;
use tracing::warn;

/// Version-control operations used by the workflow
///
/// Exactly one branch is checked out at a time. Operations that switch
/// branches should run inside [`with_checkout_restored`].
pub trait Repository {
    /// Name of the checked-out branch (`HEAD` when detached)
    fn current_branch(&self) -> Result<String>;

    /// Check out an existing branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Pull `branch` from `remote` into the checked-out branch
    fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create `name` from `from_ref` and check it out
    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()>;

    /// Merge `branch` into the checked-out branch, always creating a merge commit
    ///
    /// Fails on conflict, leaving the merge in progress.
    fn merge_no_ff(&self, branch: &str) -> Result<()>;

    /// Abort an in-progress merge
    fn abort_merge(&self) -> Result<()>;

    /// Push `branch` to `remote`, setting it as upstream
    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Push `branch` to `remote`, replacing the remote branch
    ///
    /// Works whether or not the remote still has the branch. Fails if the
    /// remote branch moves between looking it up and pushing.
    fn force_push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Delete a local branch; fails if it does not exist
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Whether a local branch exists
    fn branch_exists(&self, name: &str) -> Result<bool>;
}

/// Run `f`, then check `home` out again no matter how `f` ended.
///
/// The closure is free to switch branches. An error from `f` wins over an
/// error restoring the checkout, which is only logged in that case.
pub fn with_checkout_restored<T, F>(repo: &dyn Repository, home: &str, f: F) -> Result<T>
where
    F: FnOnce(&dyn Repository) -> Result<T>,
{
    let result = f(repo);
    let restored = repo.checkout(home);

    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            warn!(branch = home, error = %restore_err, "failed to restore checkout");
            Err(e)
        }
    }
}
