//! HTTP routes for interview endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    complete_interview, create_interview, get_interview, get_report, open_interview,
    submit_message, InterviewAppState,
};

/// Creates the interview router, mounted under `/api/interviews`.
pub fn interview_routes(state: InterviewAppState) -> Router {
    Router::new()
        .route("/", post(create_interview))
        .route("/:id", get(get_interview))
        .route("/:id/open", post(open_interview))
        .route("/:id/messages", post(submit_message))
        .route("/:id/complete", post(complete_interview))
        .route("/:id/report", get(get_report))
        .with_state(state)
}
