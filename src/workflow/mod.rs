//! Workflow engine for linked production/preprod/develop PRs
//!
//! Same split as the rest of the crate's engines:
//! 1. Plan - pure decisions over gathered state (`plan`)
//! 2. Branches - repository steps that always restore the working branch (`branches`)
//! 3. Flows - the create and update flows driving both gateways (`create`, `update`)

mod branches;
mod create;
mod plan;
mod progress;
mod update;

pub use branches::PushMode;
pub use plan::{
    CompanionAction, decide_flow, open_pr_for, plan_companion_sync, probe_branch,
    prs_for_working_branch, validate_working_branch,
};
pub use progress::{NoopProgress, ProgressCallback};

use crate::config::Config;
use crate::description::DescriptionCodec;
use crate::error::Result;
use crate::input::InputSource;
use crate::platform::PlatformService;
use crate::repo::Repository;
use crate::types::{Flow, RunReport, TargetBranch};
use tracing::{debug, info};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Nothing has happened yet
    Init,
    /// Checking the working branch name
    ValidatingBranch,
    /// Test-merging develop and preprod
    CheckingConflicts,
    /// Looking for an existing Production PR
    DecidingFlow,
    /// Creating companions and PRs
    CreateFlow,
    /// Syncing companions and PRs
    UpdateFlow,
    /// Finished successfully
    Done,
    /// Stopped on an error
    Failed,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ValidatingBranch => "validating-branch",
            Self::CheckingConflicts => "checking-conflicts",
            Self::DecidingFlow => "deciding-flow",
            Self::CreateFlow => "create-flow",
            Self::UpdateFlow => "update-flow",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One run of the branch/PR workflow
pub struct Workflow<'a> {
    repo: &'a dyn Repository,
    platform: &'a dyn PlatformService,
    input: &'a mut dyn InputSource,
    progress: &'a dyn ProgressCallback,
    codec: DescriptionCodec,
    remote: String,
    state: WorkflowState,
}

impl<'a> Workflow<'a> {
    /// Set up a run against the given gateways
    pub fn new(
        repo: &'a dyn Repository,
        platform: &'a dyn PlatformService,
        input: &'a mut dyn InputSource,
        progress: &'a dyn ProgressCallback,
        config: &Config,
    ) -> Self {
        Self {
            repo,
            platform,
            input,
            progress,
            codec: DescriptionCodec::new(&config.ticket_base_url),
            remote: config.remote.clone(),
            state: WorkflowState::Init,
        }
    }

    /// Current state
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = %self.state, to = %next, "workflow transition");
        self.state = next;
    }

    /// Run to completion
    ///
    /// Stops at the first error. Nothing already done is rolled back; a
    /// later run picks up from whatever state was left.
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self) -> Result<RunReport> {
        match self.execute().await {
            Ok(report) => {
                self.transition(WorkflowState::Done);
                info!(flow = %report.flow, branch = %report.working_branch, "workflow complete");
                Ok(report)
            }
            Err(e) => {
                debug!(state = %self.state, error = %e, "workflow failed");
                self.transition(WorkflowState::Failed);
                Err(e)
            }
        }
    }

    #[allow(clippy::future_not_send)]
    async fn execute(&mut self) -> Result<RunReport> {
        let working = self.repo.current_branch()?;

        self.transition(WorkflowState::ValidatingBranch);
        validate_working_branch(&working)?;

        self.transition(WorkflowState::CheckingConflicts);
        for target in TargetBranch::COMPANIONS {
            self.progress
                .on_message(&format!("Checking {target} merges cleanly into {working}"))
                .await;
            branches::check_target_merges_cleanly(self.repo, &self.remote, &working, target)?;
        }

        self.transition(WorkflowState::DecidingFlow);
        let production_view = self.production_view(&working).await;

        match decide_flow(production_view.as_deref()) {
            Flow::Create => {
                self.transition(WorkflowState::CreateFlow);
                self.run_create(&working).await
            }
            Flow::Update => {
                self.transition(WorkflowState::UpdateFlow);
                let view = production_view.unwrap_or_default();
                self.run_update(&working, &view).await
            }
        }
    }

    /// View of the working branch's PR; lookup failures count as no PR
    async fn production_view(&self, working: &str) -> Option<String> {
        match self.platform.view_pr(working).await {
            Ok(view) => view,
            Err(e) => {
                debug!(branch = working, error = %e, "PR lookup failed, treating as no PR");
                None
            }
        }
    }
}
