//! Task record: a freeform note contained in a topic

use serde::{Deserialize, Serialize};

use crate::id::{generate_task_id, now_rfc3339};
use crate::storage::HasId;

/// A task belongs to exactly one topic through the collection it is stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 creation time; defines consumption order
    pub created_at: String,
}

impl Task {
    /// Create a task with blank content
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: generate_task_id(),
            title: title.into(),
            content: String::new(),
            created_at: now_rfc3339(),
        }
    }
}

impl HasId for Task {
    fn id(&self) -> &str {
        &self.id
    }
}
