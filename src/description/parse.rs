//! Parsing of `gh pr view` text back into PR props and links

use super::{METADATA_SEPARATOR, RELATED_HEADER, SUMMARY_HEADER, TICKETS_HEADER};
use crate::error::{Error, Result};
use crate::types::{PrLinkTable, PullRequestProps, TargetBranch, TicketIds};
use regex::Regex;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<ticket>[^:\s][^:]*): (?P<title>.+) \(production\)$").expect("valid regex")
});

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[(?P<id>[^\]]+)\]\(.*\)$").expect("valid regex"));

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^_(?P<label>[A-Za-z]+)_:[ \t]*(?P<link>\S+)$").expect("valid regex")
});

/// State reconstructed from the Production PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPr {
    /// Ticket IDs, title and summary
    pub props: PullRequestProps,
    /// Links of all three PRs
    pub links: PrLinkTable,
}

/// Split view text into metadata lines and body
fn split_view(raw: &str) -> Result<(Vec<&str>, &str)> {
    let mut metadata = Vec::new();
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches('\n');
        if line.trim_end() == METADATA_SEPARATOR {
            return Ok((metadata, &raw[offset..]));
        }
        metadata.push(line);
    }

    Err(Error::MalformedPrText(format!(
        "no '{METADATA_SEPARATOR}' line separating metadata from body"
    )))
}

/// Value of a `key:\tvalue` metadata line
fn metadata_value<'a>(metadata: &[&'a str], key: &str) -> Option<&'a str> {
    metadata.iter().find_map(|line| {
        line.strip_prefix(key)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim())
    })
}

/// PR state (`OPEN`, `CLOSED`, `MERGED`) from view text
pub fn pr_state(raw: &str) -> Option<String> {
    let raw = raw.replace("\r\n", "\n");
    let (metadata, _) = split_view(&raw).ok()?;
    metadata_value(&metadata, "state").map(str::to_uppercase)
}

/// Parse the text of a Production PR
pub fn parse_pr_view(raw: &str) -> Result<ParsedPr> {
    let raw = raw.replace("\r\n", "\n");
    let (metadata, body) = split_view(&raw)?;

    let title_line = metadata_value(&metadata, "title")
        .ok_or_else(|| Error::MalformedPrText("no title line".to_string()))?;
    let caps = TITLE_RE.captures(title_line).ok_or_else(|| {
        Error::MalformedPrText(format!(
            "title '{title_line}' does not match '{{ticket}}: {{title}} (production)'"
        ))
    })?;
    let first_ticket = &caps["ticket"];
    let title = caps["title"].to_string();

    let summary_header = format!("{SUMMARY_HEADER}\n");
    let tickets_header = format!("\n\n{TICKETS_HEADER}\n");

    let summary_start = body
        .find(&summary_header)
        .ok_or_else(|| missing_section(SUMMARY_HEADER))?
        + summary_header.len();
    let after_summary = &body[summary_start..];
    let summary_len = after_summary
        .find(&tickets_header)
        .ok_or_else(|| missing_section(TICKETS_HEADER))?;
    let summary = after_summary[..summary_len].to_string();

    let tickets_section = &after_summary[summary_len + tickets_header.len()..];
    let related_start = tickets_section
        .find(RELATED_HEADER)
        .ok_or_else(|| missing_section(RELATED_HEADER))?;

    let mut ticket_ids = TicketIds::new();
    ticket_ids.insert(first_ticket);
    for line in tickets_section[..related_start].lines() {
        if let Some(caps) = TICKET_RE.captures(line.trim_end()) {
            ticket_ids.insert(&caps["id"]);
        }
    }

    let links = parse_related(&tickets_section[related_start + RELATED_HEADER.len()..])?;

    Ok(ParsedPr {
        props: PullRequestProps {
            ticket_ids,
            title,
            summary,
        },
        links,
    })
}

fn parse_related(section: &str) -> Result<PrLinkTable> {
    let mut links = PrLinkTable::new();
    for line in section.lines() {
        let Some(caps) = LINK_RE.captures(line.trim()) else {
            continue;
        };
        if let Some(target) = TargetBranch::from_label(&caps["label"]) {
            links.insert(target, &caps["link"]);
        }
    }

    if let Some(missing) = TargetBranch::PR_ORDER
        .into_iter()
        .find(|t| !links.contains(*t))
    {
        return Err(Error::MalformedPrText(format!(
            "no '_{}_:' line in {RELATED_HEADER}",
            missing.label()
        )));
    }
    Ok(links)
}

fn missing_section(header: &str) -> Error {
    Error::MalformedPrText(format!("missing '{header}' section"))
}
