//! Command-line front end

pub mod context;
pub mod run;
pub mod style;

pub use run::run_workflow;

use anstream::println;
use async_trait::async_trait;
use gitdid::workflow::ProgressCallback;
use style::arrow;

/// Prints workflow progress as one line per step
pub struct CliProgress {
    indent: &'static str,
}

impl CliProgress {
    /// Progress with a short indent
    pub const fn compact() -> Self {
        Self { indent: "  " }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("{}{} {message}", self.indent, arrow());
    }
}
