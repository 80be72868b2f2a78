//! Task Entity
//!
//! A single todo record as the remote service stores it.

use serde::{Deserialize, Serialize};

/// Task identifier. Server ids are small integers; provisional ids are
/// wall-clock milliseconds, so this needs the full 64 bits.
pub type TaskId = u64;

/// A todo/task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (server-assigned or provisional)
    pub id: TaskId,
    /// Task text
    pub title: String,
    /// Completion status
    pub completed: bool,
    /// Owning user, echoed back untouched when the service sends one
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u32>,
}

impl Task {
    /// Create an incomplete task with no owner
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            user_id: None,
        }
    }

    /// Same record with `completed` negated
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }

    /// The record this request becomes once an id is known
    pub fn with_id(&self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title.clone(),
            completed: self.completed,
            user_id: None,
        }
    }
}
