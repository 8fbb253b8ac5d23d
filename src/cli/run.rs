//! Default command - create or sync the linked PRs for the current branch

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, arrow};
use anstream::println;
use gitdid::error::Result;
use gitdid::input::TerminalInput;
use gitdid::types::{Flow, RunReport, TargetBranch};
use gitdid::workflow::Workflow;
use std::path::Path;

/// Run the workflow for the repository containing `path`
#[allow(clippy::future_not_send)]
pub async fn run_workflow(path: &Path) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    tracing::debug!(root = %ctx.repo_root.display(), remote = %ctx.config.remote, "context ready");

    let mut input = TerminalInput::new();
    let progress = CliProgress::compact();

    let mut workflow = Workflow::new(
        &ctx.repo,
        ctx.platform.as_ref(),
        &mut input,
        &progress,
        &ctx.config,
    );
    let report = workflow.run().await?;

    print_summary(&report);
    Ok(())
}

fn names(targets: &[TargetBranch]) -> String {
    targets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print what the run did
fn print_summary(report: &RunReport) {
    println!();
    let headline = match report.flow {
        Flow::Create => "Pull requests created",
        Flow::Update => "Pull requests synced",
    };
    println!(
        "{} {}",
        format!("{CHECK} {headline} for").success(),
        report.working_branch.accent()
    );

    if !report.created_prs.is_empty() {
        println!("   Opened: {}", names(&report.created_prs).accent());
    }
    if !report.synced_companions.is_empty() {
        println!("   Synced: {}", names(&report.synced_companions).accent());
    }
    if !report.recreated_companions.is_empty() {
        println!("   Rebuilt: {}", names(&report.recreated_companions).accent());
    }

    println!();
    for (target, link) in report.links.iter() {
        println!("  {} {}: {}", arrow(), target.label().emphasis(), link);
    }

    if !report.failed_rewrites.is_empty() {
        println!();
        println!(
            "{}",
            "⚠ Some PR descriptions could not be updated:".warn()
        );
        for link in &report.failed_rewrites {
            println!("   {}", link.muted());
        }
        println!("{}", "   Run gitdid again to retry.".muted());
    }
}
