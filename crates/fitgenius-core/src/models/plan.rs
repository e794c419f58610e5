use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::CoreError;

/// Current plan record version. Bump this when a plan shape changes;
/// each bump requires a corresponding step in [`migrate_plan`].
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PlanType {
    Workout,
    Meal,
    Progress,
}

impl PlanType {
    pub const ALL: [PlanType; 3] = [PlanType::Workout, PlanType::Meal, PlanType::Progress];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Meal => "meal",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPlanType(s.to_string()))
    }
}

/// One training block per weekday. Rest days carry their own text
/// ("descanso" / "descanso ativo").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekDays {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WorkoutPlan {
    pub weekly_split: String,
    pub days: WeekDays,
    pub warmup_and_cooldown: String,
    pub notes_and_progression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MealPlan {
    pub weekly_meal_suggestions: String,
    pub macronutrient_distribution: String,
    pub shopping_list: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProgressFeedback {
    pub feedback: String,
}

/// Plan content, tagged by plan type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "planType", rename_all = "snake_case")]
#[ts(export)]
pub enum PlanBody {
    Workout(WorkoutPlan),
    Meal(MealPlan),
    Progress(ProgressFeedback),
}

impl PlanBody {
    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::Workout(_) => PlanType::Workout,
            Self::Meal(_) => PlanType::Meal,
            Self::Progress(_) => PlanType::Progress,
        }
    }
}

/// A generated plan as stored and cached.
///
/// `created_at` is fixed when the plan is generated; there is no way to
/// change it afterwards. A regeneration produces a new record that
/// replaces this one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GeneratedPlan {
    schema_version: u32,
    created_at: jiff::Timestamp,
    #[serde(flatten)]
    body: PlanBody,
}

impl GeneratedPlan {
    pub fn new(body: PlanBody, created_at: jiff::Timestamp) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at,
            body,
        }
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at
    }

    pub fn plan_type(&self) -> PlanType {
        self.body.plan_type()
    }

    pub fn body(&self) -> &PlanBody {
        &self.body
    }

    pub fn into_body(self) -> PlanBody {
        self.body
    }
}

/// Decode a stored plan record, upgrading older shapes first.
///
/// Runs sequential migrations on the raw JSON from the record's
/// `schemaVersion` (missing = 0) up to [`CURRENT_SCHEMA_VERSION`], then
/// deserializes. The decoded plan must be of `expected` type.
pub fn migrate_plan(mut json: Value, expected: PlanType) -> Result<GeneratedPlan, CoreError> {
    let version = json
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    if version > u64::from(CURRENT_SCHEMA_VERSION) {
        return Err(CoreError::UnsupportedSchemaVersion {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    // v0 → v1: untagged flow output plus createdAt. The first workout
    // flow returned a single `workoutPlan` text instead of per-day fields.
    if version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CoreError::InvalidDocType("plan record is not a JSON object".into()))?;

        if expected == PlanType::Workout
            && !obj.contains_key("days")
            && let Some(Value::String(text)) = obj.remove("workoutPlan")
        {
            obj.insert("weeklySplit".into(), Value::String(text));
            obj.insert("days".into(), serde_json::to_value(WeekDays::default())?);
            obj.entry("warmupAndCooldown")
                .or_insert(Value::String(String::new()));
            obj.entry("notesAndProgression")
                .or_insert(Value::String(String::new()));
        }

        // Without a timestamp the record cannot hold back a regeneration.
        obj.entry("createdAt")
            .or_insert(Value::String(jiff::Timestamp::UNIX_EPOCH.to_string()));
        obj.entry("planType")
            .or_insert(Value::String(expected.as_str().to_string()));
        obj.insert("schemaVersion".into(), Value::Number(1.into()));
        tracing::info!(plan_type = %expected, "migrated plan record v0 → v1");
    }

    // Future migrations go here:
    // if version < 2 { ... }

    let plan: GeneratedPlan = serde_json::from_value(json)?;
    if plan.plan_type() != expected {
        return Err(CoreError::InvalidDocType(format!(
            "expected {expected} plan, found {}",
            plan.plan_type()
        )));
    }
    Ok(plan)
}
