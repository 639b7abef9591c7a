//! Interview Orchestrator - conversational HR interview engine.
//!
//! One free-form conversation drives five assessment modules at once:
//! professional knowledge, personality typing, competencies, peer
//! observation and the candidate profile. Every answer is mined by all five
//! evaluators concurrently while a scheduler decides which module owns the
//! next question.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
