//! Read-side store for the task feed.
//!
//! One adapter call returns everything a feed page needs per task: the task
//! row plus project, assignee, tag list, comment count, and latest comment,
//! batched into a single query. Consumers never issue per-task lookups.

pub mod store;
pub mod types;

pub use store::{FeedStore, PgFeedStore};
pub use types::{FeedPosition, TagRef, TaskRow, TaskStatus};
