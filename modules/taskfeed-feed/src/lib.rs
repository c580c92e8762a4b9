//! Feed assembly: cursor codec, keyset pagination, and row-to-DTO projection.
//!
//! The assembler is a pure read path. It decodes the caller's cursor
//! (leniently — a bad cursor means "start from the top", never an error),
//! overfetches one row to detect a further page, and flattens the store's
//! composite rows into the wire DTOs.

pub mod assembler;
pub mod cursor;
pub mod dto;

pub use assembler::build_page;
pub use cursor::CursorError;
pub use dto::{CommentSummary, EntityRef, FeedItem, FeedPage};
