//! HTTP handlers for interview endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::{InterviewError, InterviewService};
use crate::domain::foundation::{SessionId, UserId};

use super::dto::{
    CreateInterviewRequest, ErrorResponse, ReportResponse, SessionResponse, SubmitMessageRequest,
    TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InterviewAppState {
    service: Arc<InterviewService>,
}

impl InterviewAppState {
    pub fn new(service: Arc<InterviewService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/interviews - Create a new interview session
pub async fn create_interview(
    State(state): State<InterviewAppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Response {
    let user_id = match UserId::new(req.user_id.clone()) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&e))).into_response(),
    };

    match state.service.create_session(user_id, req.settings()).await {
        Ok(session) => (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_interview_error(e),
    }
}

/// POST /api/interviews/:id/open - Produce the welcome message
pub async fn open_interview(
    State(state): State<InterviewAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.open_session(session_id).await {
        Ok(reply) => (StatusCode::OK, Json(TurnResponse::from(reply))).into_response(),
        Err(e) => handle_interview_error(e),
    }
}

/// POST /api/interviews/:id/messages - Submit one candidate utterance
pub async fn submit_message(
    State(state): State<InterviewAppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitMessageRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.submit_utterance(session_id, &req.text).await {
        Ok(reply) => (StatusCode::OK, Json(TurnResponse::from(reply))).into_response(),
        Err(e) => handle_interview_error(e),
    }
}

/// POST /api/interviews/:id/complete - End the interview
pub async fn complete_interview(
    State(state): State<InterviewAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.complete_session(session_id).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_interview_error(e),
    }
}

/// GET /api/interviews/:id - Session snapshot
pub async fn get_interview(
    State(state): State<InterviewAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.get_session(session_id).await {
        Ok(Some(session)) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Ok(None) => handle_interview_error(InterviewError::SessionNotFound(session_id)),
        Err(e) => handle_interview_error(e),
    }
}

/// GET /api/interviews/:id/report - Report with generated summary
pub async fn get_report(
    State(state): State<InterviewAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.report(session_id).await {
        Ok(report) => (StatusCode::OK, Json(ReportResponse::from(report))).into_response(),
        Err(e) => handle_interview_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

fn status_for(error: &InterviewError) -> StatusCode {
    match error {
        InterviewError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        InterviewError::SessionCompleted(_) => StatusCode::CONFLICT,
        InterviewError::EmptyUtterance | InterviewError::Validation(_) => StatusCode::BAD_REQUEST,
        InterviewError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_interview_error(error: InterviewError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "Interview request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}
