//! fitgenius-bedrock
//!
//! Plan and assistant generation: typed operations over named prompt
//! templates, backed by the Bedrock Converse API.

pub mod backend;
pub mod client;
pub mod error;
pub mod generation;
pub mod prompts;
