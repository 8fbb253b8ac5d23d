//! Terminal styling helpers
//!
//! Output goes through `anstream`, which drops the colors when stdout is not
//! a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Check mark for completed steps
pub const CHECK: &str = "✓";

/// Styling shortcuts for anything printable
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Highlighted value (branch names, counts, links)
    fn accent(&self) -> String;
    /// Secondary text
    fn muted(&self) -> String;
    /// Success
    fn success(&self) -> String;
    /// Warning
    fn warn(&self) -> String;
    /// Error
    fn error(&self) -> String;
}

impl<T: std::fmt::Display + ?Sized> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled arrow for step lines
pub fn arrow() -> String {
    "→".accent()
}

/// Spinner style used while waiting on external tools
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
