//! fitgenius-storage
//!
//! Per-user document storage on S3 and the profile store built on it.

pub mod client;
pub mod documents;
pub mod error;
pub mod objects;
pub mod profiles;
