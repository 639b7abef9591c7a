//! HTTP adapters - REST API implementations.
//!
//! The Caller API lives under `/api/interviews`; `/health` is unauthenticated
//! and always answers.

pub mod interview;

use axum::{routing::get, Router};

pub use interview::{interview_routes, InterviewAppState};

/// Full API router.
pub fn api_router(state: InterviewAppState) -> Router {
    Router::new()
        .route("/health", get(interview::health))
        .nest("/api/interviews", interview_routes(state))
}
