//! Observer port for task snapshot notifications.

use async_trait::async_trait;

use super::domain::Task;

/// Receives every task snapshot produced during dispatch.
///
/// The connection notifies the observer when a task is created and after
/// each status or artifact update it folds in. Observation is a
/// notification path: implementations absorb their own failures (logging
/// them) rather than interrupting an in-flight exchange.
#[async_trait]
pub trait TaskObserver: Send + Sync {
    /// Called with the current task snapshot after each change.
    async fn on_task_update(&self, task: &Task);
}
