//! Progress reporting for workflow runs

use async_trait::async_trait;

/// Receives human-readable progress while a workflow runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Report a step
    async fn on_message(&self, message: &str);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}
