//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the interview engine to external systems:
//! - `ai` - Text-generation collaborators (OpenAI-compatible HTTP, scripted mock)
//! - `storage` - Session stores (in-memory, YAML files)
//! - `competency` - Competency trackers (in-memory recorder, HTTP submitter)
//! - `http` - axum Caller API

pub mod ai;
pub mod competency;
pub mod http;
pub mod storage;
