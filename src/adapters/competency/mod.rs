//! Competency tracker adapters.
//!
//! - **HttpCompetencyTracker** - POSTs submissions to an external tracking service
//! - **InMemoryCompetencyTracker** - Records submissions in memory (testing/development)

mod http_tracker;
mod in_memory_tracker;

pub use http_tracker::{HttpCompetencyTracker, HttpTrackerConfig};
pub use in_memory_tracker::InMemoryCompetencyTracker;
