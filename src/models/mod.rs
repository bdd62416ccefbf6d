use async_graphql::InputObject;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub task: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Build a new todo with a fresh id, stamped with the current time at
    /// microsecond precision (the precision the database stores).
    pub fn new(task: impl Into<String>, completed: bool) -> Self {
        Todo {
            id: Uuid::new_v4(),
            task: task.into(),
            completed,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Writable fields of a todo, accepted by create and update.
///
/// `id` and `created_at` are not writable; such keys in a request body are
/// ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, InputObject)]
pub struct TodoInput {
    pub task: String,
    #[serde(default)]
    #[graphql(default)]
    pub completed: bool,
}
