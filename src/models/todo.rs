use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating or updating a todo.
/// Updates overwrite every field, so the same constraints apply to both.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TodoRequest {
    /// At least 3 characters.
    #[validate(length(min = 3))]
    pub title: String,

    /// Between 3 and 100 characters.
    #[validate(length(min = 3, max = 100))]
    pub description: String,

    /// 1 (lowest) to 5 (highest).
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,

    pub complete: bool,
}

/// A todo row as stored in the `todos` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Assigned by the database on insert.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TodoIdPath {
    #[validate(range(min = 1))]
    pub todo_id: i64,
}
