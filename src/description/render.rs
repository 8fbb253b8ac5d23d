//! Rendering of canonical PR bodies

use super::{RELATED_HEADER, SUMMARY_HEADER, TICKETS_HEADER};
use crate::error::{Error, Result};
use crate::types::{PrLinkTable, PullRequestProps, TargetBranch};

/// Title of a target's PR: `{ticket}: {title} ({target})`
pub fn pr_title(ticket: &str, title: &str, target: TargetBranch) -> String {
    format!("{ticket}: {title} ({target})")
}

/// Renders PR bodies with ticket links under a fixed URL prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionCodec {
    ticket_base_url: String,
}

impl DescriptionCodec {
    /// Create a codec linking tickets to `{ticket_base_url}/{id}`
    pub fn new(ticket_base_url: &str) -> Self {
        Self {
            ticket_base_url: ticket_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Link for one ticket
    pub fn ticket_url(&self, ticket_id: &str) -> String {
        format!("{}/{ticket_id}", self.ticket_base_url)
    }

    /// Full canonical body
    ///
    /// Every target must have a link.
    pub fn render(&self, props: &PullRequestProps, links: &PrLinkTable) -> Result<String> {
        let tickets = props
            .ticket_ids
            .iter()
            .map(|id| format!("- [{id}]({})", self.ticket_url(id)))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "{SUMMARY_HEADER}\n{}\n\n{TICKETS_HEADER}\n{tickets}\n\n{}",
            props.summary,
            render_related(links)?
        ))
    }

    /// Replace only the Related Pull Requests section of `body`
    ///
    /// A body without the section gets it appended.
    pub fn replace_related(&self, body: &str, links: &PrLinkTable) -> Result<String> {
        let related = render_related(links)?;
        let prefix = related_section_start(body)
            .map_or(body, |idx| &body[..idx])
            .trim_end();

        if prefix.is_empty() {
            Ok(related)
        } else {
            Ok(format!("{prefix}\n\n{related}"))
        }
    }
}

/// Offset of the last Related header that starts a line
///
/// The section is always last, so a header quoted earlier in the summary is skipped.
fn related_section_start(body: &str) -> Option<usize> {
    body.rmatch_indices(RELATED_HEADER)
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || body[..idx].ends_with('\n'))
}

fn render_related(links: &PrLinkTable) -> Result<String> {
    let mut out = String::from(RELATED_HEADER);
    for target in TargetBranch::PR_ORDER {
        let link = links
            .get(target)
            .ok_or_else(|| Error::MissingPrLink(target.label().to_string()))?;
        out.push_str(&format!("\n_{}_: {link}", target.label()));
    }
    Ok(out)
}
