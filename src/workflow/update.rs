//! Later runs: bring companions up to date, replace closed companion PRs

use super::Workflow;
use super::branches::{self, PushMode};
use super::plan::{CompanionAction, plan_companion_sync, prs_for_working_branch};
use crate::description::{ParsedPr, parse_pr_view, pr_title};
use crate::error::{Error, Result};
use crate::types::{Flow, PrLinkTable, RunReport};
use futures::future::join_all;
use tracing::{debug, warn};

impl Workflow<'_> {
    #[allow(clippy::future_not_send)]
    pub(super) async fn run_update(
        &mut self,
        working: &str,
        production_view: &str,
    ) -> Result<RunReport> {
        let mut report = RunReport::new(Flow::Update, working.to_string());

        let ParsedPr { props, links } = parse_pr_view(production_view)?;
        report.links = links;
        let first_ticket = props
            .ticket_ids
            .first()
            .ok_or_else(|| Error::MalformedPrText("no ticket ID".to_string()))?;

        let open_prs = self.platform.list_open_prs().await?;
        let actions = plan_companion_sync(working, &open_prs);
        debug!(?actions, "planned companion sync");

        for action in actions {
            match action {
                CompanionAction::Sync { target, branch } => {
                    self.progress
                        .on_message(&format!("Merging {working} into {branch}"))
                        .await;
                    branches::sync_companion(self.repo, &self.remote, working, &branch)?;
                    report.synced_companions.push(target);
                }
                CompanionAction::Recreate { target, branch } => {
                    self.progress
                        .on_message(&format!("{target} PR is closed, rebuilding {branch}"))
                        .await;
                    branches::remove_stale_companion(self.repo, &branch)?;
                    branches::create_companion(
                        self.repo,
                        &self.remote,
                        working,
                        target,
                        PushMode::Replace,
                    )?;

                    let title = pr_title(first_ticket, &props.title, target);
                    let body = self.codec.render(&props, &report.links)?;
                    let link = self
                        .platform
                        .create_pr(target.branch_name(), &branch, &title, &body)
                        .await?;
                    self.progress
                        .on_message(&format!("Opened {target} PR {link}"))
                        .await;

                    report.links.insert(target, link);
                    report.created_prs.push(target);
                    report.recreated_companions.push(target);
                }
            }
        }

        if !report.recreated_companions.is_empty() {
            report.failed_rewrites = self.rewrite_related_sections(working, &report.links).await?;
        }

        Ok(report)
    }

    /// Point every open PR of the working branch at the current links
    ///
    /// Edits run concurrently. Returns the PRs whose edit failed.
    #[allow(clippy::future_not_send)]
    async fn rewrite_related_sections(
        &self,
        working: &str,
        links: &PrLinkTable,
    ) -> Result<Vec<String>> {
        let open_prs = self.platform.list_open_prs().await?;
        let targets = prs_for_working_branch(working, &open_prs);
        debug!(count = targets.len(), "rewriting related PR sections");

        let edits = targets.into_iter().map(|pr| async move {
            let identifier = pr.number.to_string();
            let result = match self.codec.replace_related(&pr.body, links) {
                Ok(body) => self.platform.edit_pr(&identifier, &body).await,
                Err(e) => Err(e),
            };
            (pr, result)
        });

        let mut failed = Vec::new();
        for (pr, result) in join_all(edits).await {
            match result {
                Ok(()) => {
                    self.progress
                        .on_message(&format!("Updated links on #{} ({})", pr.number, pr.head_ref))
                        .await;
                }
                Err(e) => {
                    warn!(pr = pr.number, head = %pr.head_ref, error = %e, "failed to update PR links");
                    failed.push(pr.url.clone());
                }
            }
        }

        Ok(failed)
    }
}
