use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single task in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque ID, assigned once at creation and never reused
    pub id: String,
    /// Task text (always trimmed and non-empty)
    pub text: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// When the task was added
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new, not-yet-completed task
    pub fn new(id: String, text: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// The checkbox shown next to the task in listings
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

/// The single in-flight text edit, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// ID of the task being edited
    pub task_id: String,
    /// Draft text, not yet committed
    pub draft: String,
}
