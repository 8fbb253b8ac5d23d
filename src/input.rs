//! Line-based input for the create flow

use crate::error::{Error, Result};
use crate::types::{PullRequestProps, TicketIds};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

/// Source of answers to prompts, one line per call
pub trait InputSource {
    /// Show `prompt` and read one line
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on the terminal
#[derive(Default)]
pub struct TerminalInput {
    theme: ColorfulTheme,
}

impl TerminalInput {
    /// Create a terminal input source
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Input(format!("Failed to read '{prompt}': {e}")))
    }
}

/// Split a comma-separated ticket list, dropping blanks and duplicates
pub fn parse_ticket_ids(line: &str) -> TicketIds {
    line.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Characters that would make a ticket ID unreadable in a PR title or ticket bullet
const FORBIDDEN_TICKET_CHARS: &[char] = &[':', '[', ']', '(', ')'];

/// Reject a ticket ID that could not be read back from a PR
pub fn validate_ticket_id(id: &str) -> Result<()> {
    if id.chars().any(char::is_whitespace) {
        return Err(Error::Input(format!(
            "ticket ID '{id}' must not contain whitespace"
        )));
    }
    if let Some(c) = id.chars().find(|c| FORBIDDEN_TICKET_CHARS.contains(c)) {
        return Err(Error::Input(format!(
            "ticket ID '{id}' must not contain '{c}'"
        )));
    }
    Ok(())
}

/// Ask for ticket IDs, title and summary, in that order
pub fn prompt_pr_props(input: &mut dyn InputSource) -> Result<PullRequestProps> {
    let ticket_ids = parse_ticket_ids(&input.read_line("Ticket ID(s), comma-separated")?);
    if ticket_ids.is_empty() {
        return Err(Error::Input("at least one ticket ID is required".to_string()));
    }
    for id in ticket_ids.iter() {
        validate_ticket_id(id)?;
    }

    let title = input.read_line("PR title")?.trim().to_string();
    if title.is_empty() {
        return Err(Error::Input("PR title must not be empty".to_string()));
    }

    let summary = input.read_line("PR summary")?.trim_end().to_string();

    Ok(PullRequestProps {
        ticket_ids,
        title,
        summary,
    })
}
