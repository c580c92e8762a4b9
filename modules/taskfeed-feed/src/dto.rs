//! Wire DTOs for the feed endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskfeed_store::{TagRef, TaskRow, TaskStatus};

/// Comment bodies longer than this are cut down to a snippet.
pub const SNIPPET_MAX_CHARS: usize = 120;

/// A related entity as the feed shows it: id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

/// The most recent comment on a task, with a length-bounded body preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub author: EntityRef,
    pub snippet: String,
}

/// One task as rendered in the feed, flattened from the store's join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub project: EntityRef,
    pub assignee: EntityRef,
    /// Tags in join order. Empty for untagged tasks, never null.
    pub tags: Vec<TagRef>,
    pub comments_count: i64,
    pub last_comment: Option<CommentSummary>,
    pub created_at: DateTime<Utc>,
}

/// One page of the feed. `next_cursor` is null on the terminal page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub next_cursor: Option<String>,
}

impl FeedItem {
    /// Flatten a composite store row into the wire shape.
    pub fn from_row(row: TaskRow) -> Self {
        let last_comment = match (
            row.last_comment_id,
            row.last_comment_body,
            row.last_comment_created_at,
            row.last_comment_author_id,
            row.last_comment_author_name,
        ) {
            (Some(id), Some(body), Some(created_at), Some(author_id), Some(author_name)) => {
                Some(CommentSummary {
                    id,
                    created_at,
                    author: EntityRef {
                        id: author_id,
                        name: author_name,
                    },
                    snippet: make_snippet(&body),
                })
            }
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            status: row.status,
            project: EntityRef {
                id: row.project_id,
                name: row.project_name,
            },
            assignee: EntityRef {
                id: row.assignee_id,
                name: row.assignee_name,
            },
            tags: row.tags.0,
            comments_count: row.comments_count,
            last_comment,
            created_at: row.created_at,
        }
    }
}

/// Truncate a comment body to `SNIPPET_MAX_CHARS` characters, appending an
/// ellipsis only when something was actually cut. Counts characters, not
/// bytes, so multibyte bodies are never split mid-character.
fn make_snippet(body: &str) -> String {
    let mut chars = body.char_indices();
    match chars.nth(SNIPPET_MAX_CHARS) {
        None => body.to_string(),
        Some((byte_idx, _)) => {
            let mut snippet = body[..byte_idx].to_string();
            snippet.push('…');
            snippet
        }
    }
}
