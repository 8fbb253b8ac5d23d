//! First run: create companions, open the three PRs, cross-link them

use super::Workflow;
use super::branches::{self, PushMode};
use super::plan::open_pr_for;
use crate::description::pr_title;
use crate::error::{Error, Result};
use crate::input::prompt_pr_props;
use crate::types::{Flow, RunReport, TargetBranch};
use tracing::info;

impl Workflow<'_> {
    #[allow(clippy::future_not_send)]
    pub(super) async fn run_create(&mut self, working: &str) -> Result<RunReport> {
        let mut report = RunReport::new(Flow::Create, working.to_string());

        let props = prompt_pr_props(&mut *self.input)?;
        let first_ticket = props
            .ticket_ids
            .first()
            .ok_or_else(|| Error::Input("at least one ticket ID is required".to_string()))?;

        for target in TargetBranch::COMPANIONS {
            let companion = target.head_branch(working);
            // Left behind by an interrupted run
            if self.repo.branch_exists(&companion)? {
                self.progress
                    .on_message(&format!("Updating existing {companion}"))
                    .await;
                branches::sync_companion(self.repo, &self.remote, working, &companion)?;
                report.synced_companions.push(target);
            } else {
                self.progress
                    .on_message(&format!("Creating {companion} from {target}"))
                    .await;
                branches::create_companion(
                    self.repo,
                    &self.remote,
                    working,
                    target,
                    PushMode::Normal,
                )?;
            }
        }

        let open_prs = self.platform.list_open_prs().await?;
        for target in TargetBranch::PR_ORDER {
            let link = if let Some(existing) = open_pr_for(working, target, &open_prs) {
                self.progress
                    .on_message(&format!("Reusing open {target} PR {}", existing.url))
                    .await;
                existing.url.clone()
            } else {
                let head = target.head_branch(working);
                let title = pr_title(first_ticket, &props.title, target);
                let link = self
                    .platform
                    .create_pr(target.branch_name(), &head, &title, &props.summary)
                    .await?;
                self.progress
                    .on_message(&format!("Opened {target} PR {link}"))
                    .await;
                report.created_prs.push(target);
                link
            };
            report.links.insert(target, link);
        }

        let body = self.codec.render(&props, &report.links)?;
        for (target, link) in report.links.iter() {
            self.platform.edit_pr(link, &body).await?;
            info!(%target, link, "linked PR description");
        }
        self.progress
            .on_message("Cross-linked all pull requests")
            .await;

        Ok(report)
    }
}
