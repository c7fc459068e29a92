//! In-memory task store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use super::domain::{Task, TaskId};
use super::ports::TaskObserver;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors returned by the task store.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The internal lock was poisoned by a panicking writer.
    #[error("task store lock poisoned: {0}")]
    LockPoisoned(String),
}

#[derive(Debug, Default)]
struct TaskStoreState {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

/// Thread-safe in-memory task store.
///
/// Tasks are upserted by id: created on dispatch, replaced wholesale on
/// each status report, never deleted. Insertion order is preserved for
/// listing.
#[derive(Debug, Default)]
pub struct TaskStore {
    state: RwLock<TaskStoreState>,
}

impl TaskStore {
    /// Creates an empty task store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a task snapshot.
    ///
    /// The incoming snapshot wins unconditionally; an unexpected lifecycle
    /// transition is logged for diagnosis but never rejected, because the
    /// remote's latest status is authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::LockPoisoned`] on a poisoned lock.
    pub fn upsert(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| TaskStoreError::LockPoisoned(e.to_string()))?;

        if let Some(existing) = state.tasks.get(&task.task_id()) {
            let from = existing.status().state;
            let to = task.status().state;
            if from != to && !from.can_transition_to(to) {
                tracing::warn!(
                    task_id = %task.task_id(),
                    %from,
                    %to,
                    "irregular task state transition"
                );
            }
        } else {
            state.order.push(task.task_id());
        }

        state.tasks.insert(task.task_id(), task.clone());
        Ok(())
    }

    /// Looks up a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::LockPoisoned`] on a poisoned lock.
    pub fn get(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self
            .state
            .read()
            .map_err(|e| TaskStoreError::LockPoisoned(e.to_string()))?;
        Ok(state.tasks.get(&id).cloned())
    }

    /// Returns all tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::LockPoisoned`] on a poisoned lock.
    pub fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self
            .state
            .read()
            .map_err(|e| TaskStoreError::LockPoisoned(e.to_string()))?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskObserver for TaskStore {
    async fn on_task_update(&self, task: &Task) {
        if let Err(error) = self.upsert(task) {
            tracing::error!(task_id = %task.task_id(), %error, "failed to record task update");
        }
    }
}
