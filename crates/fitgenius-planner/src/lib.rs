//! fitgenius-planner
//!
//! Plan generation: the two-tier plan cache, the generation workflow
//! with its cooldown gate, view state for mounted plan views, and the
//! session-scoped assistant chat.

pub mod assistant;
pub mod cache;
pub mod error;
pub mod session;
pub mod view;
pub mod workflow;
