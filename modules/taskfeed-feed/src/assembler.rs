//! Page assembly: decode cursor, overfetch by one, trim, derive next cursor.

use anyhow::Result;
use tracing::debug;

use taskfeed_store::FeedStore;

use crate::cursor;
use crate::dto::{FeedItem, FeedPage};

/// Build one page of the feed.
///
/// A malformed `cursor` is treated as absent — the page is served from the
/// top of the feed instead of failing the request. That asymmetry with the
/// strict `limit` validation upstream is deliberate and observable behavior.
///
/// `limit` is trusted here; the transport layer has already bounded it.
pub async fn build_page(
    store: &dyn FeedStore,
    limit: usize,
    cursor: Option<&str>,
) -> Result<FeedPage> {
    let after = cursor.and_then(|token| match cursor::decode(token) {
        Ok(pos) => Some(pos),
        Err(e) => {
            debug!(error = %e, "ignoring malformed cursor, serving first page");
            None
        }
    });

    // Overfetch by one row: the extra row only signals that a further page
    // exists, it is never returned.
    let mut rows = store
        .fetch_page(after.as_ref(), limit as i64 + 1)
        .await?;

    let has_more = rows.len() > limit;
    rows.truncate(limit);

    // The next cursor points at the last row we keep, not the discarded one.
    let next_cursor = if has_more {
        rows.last().map(|row| cursor::encode(&row.position()))
    } else {
        None
    };

    let items = rows.into_iter().map(FeedItem::from_row).collect();

    Ok(FeedPage { items, next_cursor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use sqlx::types::Json;
    use std::sync::Mutex;

    use taskfeed_store::{FeedPosition, TaskRow, TaskStatus};

    /// In-memory store that mimics the Postgres ordering and filter.
    /// Records every position filter it was called with.
    struct FakeStore {
        rows: Vec<TaskRow>,
        calls: Mutex<Vec<(Option<FeedPosition>, i64)>>,
    }

    impl FakeStore {
        fn new(rows: Vec<TaskRow>) -> Self {
            Self {
                rows,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedStore for FakeStore {
        async fn fetch_page(
            &self,
            after: Option<&FeedPosition>,
            limit: i64,
        ) -> Result<Vec<TaskRow>> {
            self.calls
                .lock()
                .unwrap()
                .push((after.cloned(), limit));

            let mut rows: Vec<TaskRow> = self
                .rows
                .iter()
                .filter(|r| match after {
                    None => true,
                    Some(pos) => {
                        r.created_at < pos.created_at
                            || (r.created_at == pos.created_at && r.id < pos.id)
                    }
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            rows.truncate(limit as usize);
            Ok(rows)
        }
    }

    /// A store whose query always fails.
    struct BrokenStore;

    #[async_trait]
    impl FeedStore for BrokenStore {
        async fn fetch_page(
            &self,
            _after: Option<&FeedPosition>,
            _limit: i64,
        ) -> Result<Vec<TaskRow>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn row(id: &str, offset_secs: i64) -> TaskRow {
        TaskRow {
            id: id.to_string(),
            title: format!("task {id}"),
            status: TaskStatus::Open,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
                + chrono::Duration::seconds(offset_secs),
            project_id: "proj-1".to_string(),
            project_name: "Apollo".to_string(),
            assignee_id: "user-1".to_string(),
            assignee_name: "Ada".to_string(),
            tags: Json(vec![]),
            comments_count: 0,
            last_comment_id: None,
            last_comment_body: None,
            last_comment_created_at: None,
            last_comment_author_id: None,
            last_comment_author_name: None,
        }
    }

    #[tokio::test]
    async fn full_page_sets_next_cursor_to_last_kept_row() {
        let store = FakeStore::new(vec![row("t1", 0), row("t2", 10), row("t3", 20)]);

        let page = build_page(&store, 2, None).await.unwrap();

        let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);

        // Cursor decodes to the last *returned* item, not the overfetched one.
        let pos = cursor::decode(&page.next_cursor.unwrap()).unwrap();
        assert_eq!(pos.id, "t2");
        assert_eq!(pos.created_at, store.rows[1].created_at);
    }

    #[tokio::test]
    async fn terminal_page_has_no_cursor() {
        let store = FakeStore::new(vec![row("t1", 0), row("t2", 10)]);

        let page = build_page(&store, 2, None).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn empty_store_yields_empty_terminal_page() {
        let store = FakeStore::new(vec![]);

        let page = build_page(&store, 20, None).await.unwrap();

        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn overfetches_exactly_one_row() {
        let store = FakeStore::new(vec![row("t1", 0)]);

        build_page(&store, 20, None).await.unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 21);
    }

    #[tokio::test]
    async fn cursor_walk_covers_all_rows_without_overlap() {
        let store = FakeStore::new(vec![row("t1", 0), row("t2", 10), row("t3", 20)]);

        let first = build_page(&store, 2, None).await.unwrap();
        let ids: Vec<&str> = first.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);

        let token = first.next_cursor.unwrap();
        let second = build_page(&store, 2, Some(&token)).await.unwrap();
        let ids: Vec<&str> = second.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t1"]);
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn tied_timestamps_paginate_by_id() {
        // All three rows share a timestamp; the id tiebreak must carry the walk.
        let store = FakeStore::new(vec![row("ta", 0), row("tb", 0), row("tc", 0)]);

        let first = build_page(&store, 2, None).await.unwrap();
        let ids: Vec<&str> = first.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tc", "tb"]);

        let token = first.next_cursor.unwrap();
        let second = build_page(&store, 2, Some(&token)).await.unwrap();
        let ids: Vec<&str> = second.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["ta"]);
    }

    #[tokio::test]
    async fn malformed_cursor_acts_like_no_cursor() {
        let store = FakeStore::new(vec![row("t1", 0), row("t2", 10), row("t3", 20)]);

        let with_garbage = build_page(&store, 2, Some("%%%not-a-cursor%%%"))
            .await
            .unwrap();
        let without = build_page(&store, 2, None).await.unwrap();

        assert_eq!(with_garbage, without);

        // The garbage token never reached the store as a filter.
        let calls = store.calls.lock().unwrap();
        assert!(calls.iter().all(|(after, _)| after.is_none()));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let result = build_page(&BrokenStore, 20, None).await;
        assert!(result.is_err());
    }
}
