//! gitdid - linked production/preprod/develop pull requests
//!
//! From a feature branch cut from `production`, gitdid builds companion
//! branches for `develop` and `preprod`, opens one PR per target, and
//! cross-links the three PR descriptions. Later runs push new commits to the
//! companions and replace companion PRs that were closed.
//!
//! The crate is split into gateways ([`repo`], [`platform`], [`input`]), the
//! PR description codec ([`description`]) and the [`workflow`] engine that
//! drives them.

pub mod config;
pub mod description;
pub mod error;
pub mod input;
pub mod platform;
pub mod repo;
pub mod types;
pub mod workflow;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{Flow, PrLinkTable, PullRequest, PullRequestProps, RunReport, TargetBranch};
pub use workflow::{Workflow, WorkflowState};
