//! Row types returned by the feed store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task workflow state, stored as the Postgres enum `task_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
}

/// A tag as surfaced by the feed: id and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: String,
    pub name: String,
}

/// A position in the feed's total order `(created_at DESC, id DESC)`.
///
/// `created_at` is not unique across tasks; `id` is the tiebreaker that
/// makes the order total. A query filtered by a position returns only rows
/// strictly after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPosition {
    pub created_at: DateTime<Utc>,
    pub id: String,
}

/// The composite record one store call yields per task: task fields plus
/// everything the feed projects, eagerly joined. The store assembles this in
/// a single query; the caller never goes back for related rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,

    pub project_id: String,
    pub project_name: String,
    pub assignee_id: String,
    pub assignee_name: String,

    /// Tags in link-table order. Empty for untagged tasks, never null.
    pub tags: sqlx::types::Json<Vec<TagRef>>,

    pub comments_count: i64,

    // Latest comment, all null when the task has no comments.
    pub last_comment_id: Option<String>,
    pub last_comment_body: Option<String>,
    pub last_comment_created_at: Option<DateTime<Utc>>,
    pub last_comment_author_id: Option<String>,
    pub last_comment_author_name: Option<String>,
}

impl TaskRow {
    /// The row's position in the feed's total order.
    pub fn position(&self) -> FeedPosition {
        FeedPosition {
            created_at: self.created_at,
            id: self.id.clone(),
        }
    }
}
