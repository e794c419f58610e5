//! Document path conventions.
//!
//! Pure string functions, no AWS SDK dependency. Every user owns one
//! document tree rooted at `users/{user_id}`, with one sub-document per
//! generated plan type.

use crate::models::plan::PlanType;

pub const USERS_PREFIX: &str = "users/";

pub fn user_root(user_id: &str) -> String {
    format!("users/{user_id}/")
}

pub fn profile(user_id: &str) -> String {
    format!("users/{user_id}/profile")
}

pub fn plan(user_id: &str, plan_type: PlanType) -> String {
    format!("users/{user_id}/plans/{plan_type}")
}

/// A user id is used verbatim as a path segment, so it must not be able
/// to climb out of its own tree.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id != "."
        && user_id != ".."
        && !user_id.contains('/')
        && !user_id.chars().any(char::is_control)
}
