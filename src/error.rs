//! Error types for gitdid

use thiserror::Error;

/// Errors that can end a gitdid run
#[derive(Error, Debug)]
pub enum Error {
    /// The run was started from a branch that is not a feature branch
    #[error("cannot run from branch '{branch}': {reason}")]
    WrongBranch {
        /// The checked-out branch
        branch: String,
        /// Why the branch was rejected
        reason: String,
    },

    /// Merging a target branch into the working branch would conflict
    #[error(
        "merging '{target}' into '{branch}' conflicts; resolve the conflicts manually and run again"
    )]
    MergeConflict {
        /// The target branch that was merged in
        target: String,
        /// The branch the merge was attempted on
        branch: String,
    },

    /// A pull request's text does not follow the expected layout
    #[error("malformed pull request text: {0}")]
    MalformedPrText(String),

    /// A git command failed
    #[error("git error: {0}")]
    Git(String),

    /// A pull request hosting command failed
    #[error("platform error: {0}")]
    Platform(String),

    /// Reading interactive input failed or produced unusable values
    #[error("input error: {0}")]
    Input(String),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(String),

    /// A PR link needed to render a description is missing
    #[error("no pull request link recorded for {0}")]
    MissingPrLink(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for gitdid operations
pub type Result<T> = std::result::Result<T, Error>;
