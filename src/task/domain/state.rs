//! Task lifecycle states and the expected transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a delegated task.
///
/// `Completed`, `Canceled`, `Failed`, and `Unknown` are terminal: a session
/// whose active task reaches one of them is no longer live. `Submitted`,
/// `Working`, and `InputRequired` are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The task request has been accepted but work has not started.
    Submitted,
    /// The remote agent is working on the task.
    Working,
    /// The remote agent needs further user input to continue.
    InputRequired,
    /// The task finished successfully.
    Completed,
    /// The task was cancelled before completion.
    Canceled,
    /// The task failed.
    Failed,
    /// The remote reported a state this host does not recognise.
    Unknown,
}

impl TaskState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Working => "working",
            Self::InputRequired => "input_required",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for states that end a session's activity.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Canceled | Self::Failed | Self::Unknown
        )
    }

    /// Returns `true` when `next` is an expected successor of this state.
    ///
    /// The expected lifecycle is `submitted → working → {input_required,
    /// completed, canceled, failed, unknown}` with `input_required →
    /// working` on the next user turn. Remotes are not obliged to respect
    /// it (the latest received status is authoritative), so an unexpected
    /// transition is logged by the store rather than rejected.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Submitted => matches!(next, Self::Working),
            Self::Working => matches!(
                next,
                Self::InputRequired
                    | Self::Completed
                    | Self::Canceled
                    | Self::Failed
                    | Self::Unknown
            ),
            Self::InputRequired => matches!(next, Self::Working),
            Self::Completed | Self::Canceled | Self::Failed | Self::Unknown => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid task state string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task state: '{0}'")]
pub struct ParseTaskStateError(pub String);

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "working" => Ok(Self::Working),
            "input_required" => Ok(Self::InputRequired),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}
