//! fitgenius-core
//!
//! Pure domain types, profile validation, the regeneration cooldown rule
//! and document path conventions. No AWS SDK dependency; this is the
//! shared vocabulary of the FitGenius system.

pub mod cooldown;
pub mod doc_paths;
pub mod error;
pub mod models;
