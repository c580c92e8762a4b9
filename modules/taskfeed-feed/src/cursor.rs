//! Opaque pagination cursors.
//!
//! Token format: base64url-no-pad of `"<rfc3339 created_at>|<id>"`. The
//! token carries the order key and nothing else, so clients cannot infer
//! anything about the query beyond the position it names.

use base64::Engine;
use chrono::{DateTime, Utc};
use thiserror::Error;

use taskfeed_store::FeedPosition;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cursor payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("cursor payload is missing the timestamp/id separator")]
    Malformed,

    #[error("cursor timestamp is not RFC 3339: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Encode a feed position as a URL-safe token.
pub fn encode(pos: &FeedPosition) -> String {
    let raw = format!("{}|{}", pos.created_at.to_rfc3339(), pos.id);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}

/// Decode a cursor token back into a feed position.
///
/// Callers that want the leniency policy (bad cursor == no cursor) apply it
/// themselves; this function just reports what went wrong.
pub fn decode(token: &str) -> Result<FeedPosition, CursorError> {
    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(token)?;
    let payload = String::from_utf8(decoded)?;
    let (ts, id) = payload.split_once('|').ok_or(CursorError::Malformed)?;
    if id.is_empty() {
        return Err(CursorError::Malformed);
    }
    let created_at = DateTime::parse_from_rfc3339(ts)?.with_timezone(&Utc);
    Ok(FeedPosition {
        created_at,
        id: id.to_string(),
    })
}
