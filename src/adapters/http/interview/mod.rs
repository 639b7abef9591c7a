//! HTTP adapter for interview endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateInterviewRequest, ErrorResponse, MessageResponse, ModuleResponse, ReportResponse,
    SessionResponse, SubmitMessageRequest, TurnResponse,
};
pub use handlers::{health, InterviewAppState};
pub use routes::interview_routes;
