use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::plan::GeneratedPlan;

/// What a plan generation attempt looks like to the UI.
///
/// Serialized untagged so the wire shapes are exactly
/// `{"ok": plan}`, `{"blocked": daysRemaining}` and
/// `{"error": kind, "message": text}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum PlanOutcome {
    Ok { ok: GeneratedPlan },
    Blocked { blocked: i64 },
    Error { error: ErrorKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ErrorKind {
    ProfileIncomplete,
    CooldownActive,
    Validation,
    Generation,
    Persistence,
}
