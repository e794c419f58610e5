//! Regeneration cooldown.
//!
//! A plan can be regenerated once it is at least [`COOLDOWN_DAYS`] whole
//! days old. Partial days round up, and the age is taken as an absolute
//! value: a plan stamped in the future (client clock skew) counts as
//! recent instead of being an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::plan::GeneratedPlan;

pub const COOLDOWN_DAYS: i64 = 30;

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CooldownDecision {
    pub allowed: bool,
    pub days_remaining: i64,
}

impl CooldownDecision {
    pub const ALLOWED: CooldownDecision = CooldownDecision {
        allowed: true,
        days_remaining: 0,
    };
}

/// Whole days between two instants, rounded up, ignoring direction.
pub fn elapsed_days(from: jiff::Timestamp, to: jiff::Timestamp) -> i64 {
    let nanos = to.duration_since(from).as_nanos().abs();
    let days = (nanos + NANOS_PER_DAY - 1) / NANOS_PER_DAY;
    i64::try_from(days).unwrap_or(i64::MAX)
}

/// Decide whether `existing` may be replaced by a new generation at `now`.
pub fn can_regenerate(existing: Option<&GeneratedPlan>, now: jiff::Timestamp) -> CooldownDecision {
    let Some(plan) = existing else {
        return CooldownDecision::ALLOWED;
    };

    let diff_days = elapsed_days(plan.created_at(), now);
    CooldownDecision {
        allowed: diff_days >= COOLDOWN_DAYS,
        days_remaining: (COOLDOWN_DAYS - diff_days).max(0),
    }
}
