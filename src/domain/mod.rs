//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `interview` - Interview session aggregate, modules, scheduling and profiles

pub mod foundation;
pub mod interview;
