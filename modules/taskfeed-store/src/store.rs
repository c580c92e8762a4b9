//! FeedStore trait and its Postgres implementation.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::types::{FeedPosition, TaskRow};

/// Read access to the feed, one page per call.
///
/// Dyn-compatible so the assembler and the HTTP layer can run against a fake
/// store in tests. The only shared resource behind an implementation is the
/// connection pool; concurrent reads are the store's problem, not ours.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Fetch up to `limit` tasks ordered by `(created_at DESC, id DESC)`,
    /// with project, assignee, tags, comment count, and latest comment
    /// joined in. When `after` is set, only rows strictly after that
    /// position in the total order qualify.
    async fn fetch_page(&self, after: Option<&FeedPosition>, limit: i64) -> Result<Vec<TaskRow>>;
}

/// Postgres-backed feed store.
#[derive(Clone)]
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn fetch_page(&self, after: Option<&FeedPosition>, limit: i64) -> Result<Vec<TaskRow>> {
        let mut qb = sqlx::QueryBuilder::new(
            r#"
            SELECT
                t.id, t.title, t.status, t.created_at,
                p.id AS project_id, p.name AS project_name,
                u.id AS assignee_id, u.name AS assignee_name,
                tg.tags,
                cc.comments_count,
                lc.id AS last_comment_id,
                lc.body AS last_comment_body,
                lc.created_at AS last_comment_created_at,
                lc.author_id AS last_comment_author_id,
                lc.author_name AS last_comment_author_name
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            JOIN users u ON u.id = t.assignee_id
            LEFT JOIN LATERAL (
                SELECT COALESCE(
                    jsonb_agg(jsonb_build_object('id', tag.id, 'name', tag.name) ORDER BY tt.tag_id),
                    '[]'::jsonb
                ) AS tags
                FROM task_tags tt
                JOIN tags tag ON tag.id = tt.tag_id
                WHERE tt.task_id = t.id
            ) tg ON TRUE
            LEFT JOIN LATERAL (
                SELECT COUNT(*) AS comments_count
                FROM comments c
                WHERE c.task_id = t.id
            ) cc ON TRUE
            LEFT JOIN LATERAL (
                SELECT c.id, c.body, c.created_at, a.id AS author_id, a.name AS author_name
                FROM comments c
                JOIN users a ON a.id = c.author_id
                WHERE c.task_id = t.id
                ORDER BY c.created_at DESC
                LIMIT 1
            ) lc ON TRUE
            WHERE TRUE
            "#,
        );

        if let Some(pos) = after {
            qb.push("AND (t.created_at, t.id) < (");
            qb.push_bind(pos.created_at);
            qb.push(", ");
            qb.push_bind(pos.id.clone());
            qb.push(") ");
        }

        qb.push("ORDER BY t.created_at DESC, t.id DESC LIMIT ");
        qb.push_bind(limit);

        let rows = qb
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
