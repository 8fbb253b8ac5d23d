//! PR description codec
//!
//! The Production PR carries the run's state in its text. A body has three
//! sections, always in this order:
//!
//! ```text
//! ## Summary
//! {summary}
//!
//! ## Ticket(s)
//! - [AB-1]({ticket base url}/AB-1)
//!
//! ## Related Pull Requests:
//! _Production_: {link}
//! _Preprod_: {link}
//! _Develop_: {link}
//! ```
//!
//! [`parse_pr_view`] reads it back out of `gh pr view` text, whose metadata
//! block (`title:\t...` etc.) is separated from the body by a `--` line.

mod parse;
mod render;

pub use parse::{ParsedPr, parse_pr_view, pr_state};
pub use render::{DescriptionCodec, pr_title};

/// Header of the summary section
pub const SUMMARY_HEADER: &str = "## Summary";

/// Header of the ticket list section
pub const TICKETS_HEADER: &str = "## Ticket(s)";

/// Header of the cross-link section
pub const RELATED_HEADER: &str = "## Related Pull Requests:";

/// Line separating `gh pr view` metadata from the body
pub const METADATA_SEPARATOR: &str = "--";
