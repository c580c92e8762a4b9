//! REST handler for `GET /api/feed`.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::warn;

use taskfeed_feed::build_page;

use crate::AppState;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 50;

/// One violated constraint in a rejected request, as sent to the client.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ParamViolation {
    pub param: String,
    pub message: String,
}

/// Validated query parameters for the feed endpoint.
#[derive(Debug, PartialEq, Eq)]
pub struct FeedParams {
    pub limit: usize,
    pub cursor: Option<String>,
}

impl FeedParams {
    /// Strict allow-list validation: only `limit` and `cursor` are
    /// recognized, and `limit` must be an integer in 1..=50. The cursor is
    /// passed through untouched — whether it decodes is the assembler's
    /// concern, not a validation failure.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<ParamViolation>> {
        let mut violations = Vec::new();

        let mut unknown: Vec<&String> = params
            .keys()
            .filter(|k| k.as_str() != "limit" && k.as_str() != "cursor")
            .collect();
        unknown.sort();
        for key in unknown {
            violations.push(ParamViolation {
                param: key.clone(),
                message: "unrecognized parameter".to_string(),
            });
        }

        let limit = match params.get("limit") {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
                _ => {
                    violations.push(ParamViolation {
                        param: "limit".to_string(),
                        message: format!("limit must be an integer between 1 and {MAX_LIMIT}"),
                    });
                    DEFAULT_LIMIT
                }
            },
        };

        if violations.is_empty() {
            Ok(Self {
                limit,
                cursor: params.get("cursor").cloned(),
            })
        } else {
            Err(violations)
        }
    }
}

pub async fn api_feed(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let parsed = match FeedParams::from_query(&params) {
        Ok(p) => p,
        Err(violations) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid query parameters",
                    "details": violations,
                })),
            )
                .into_response();
        }
    };

    match build_page(state.store.as_ref(), parsed.limit, parsed.cursor.as_deref()).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to build feed page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "internal error"})),
            )
                .into_response()
        }
    }
}
