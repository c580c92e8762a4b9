//! HTTP surface for the task feed: router, state, and the REST handler.

pub mod rest;
pub mod routes;

pub use routes::{build_router, AppState};
