use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identifier handed out by the task collection. Starts at 1 and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// `text` must already be trimmed and non-empty; the collection enforces that.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
}

/// Point-in-time view of the collection, written out by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub stats: Stats,
}
