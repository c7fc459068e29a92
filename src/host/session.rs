//! Per-conversation session state tracked by the orchestrator.

use crate::registry::domain::AgentName;
use crate::task::domain::TaskId;

/// The orchestrator's view of one conversation.
///
/// A session is live while its most recent task is non-terminal. The
/// pinned agent is reused for subsequent turns unless the caller overrides
/// it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The agent pinned to this conversation, once routed.
    pub pinned_agent: Option<AgentName>,

    /// The active task, reused while the remote awaits further input.
    pub task_id: Option<TaskId>,

    /// `true` while the current task is in a non-terminal state.
    pub session_active: bool,

    /// `true` when the last turn requires user input before any automated
    /// follow-up may run.
    pub awaiting_input: bool,
}

impl SessionState {
    /// Creates an idle session with no pinned agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task id to continue with, when the session is live.
    #[must_use]
    pub const fn active_task(&self) -> Option<TaskId> {
        if self.session_active { self.task_id } else { None }
    }
}
