//! fitgenius-auth
//!
//! Cognito sign-in and sign-up, token validation, and the identity
//! context that publishes session lifecycle events.

pub mod client;
pub mod error;
pub mod flows;
pub mod identity;
pub mod jwt;
