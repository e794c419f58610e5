//! Typed generation operations.
//!
//! Every operation checks its required input fields before anything is
//! sent to the backend, and checks the backend's JSON output against the
//! operation's result type afterwards. There is no retry.

use std::sync::Arc;

use fitgenius_core::models::plan::{MealPlan, ProgressFeedback, WorkoutPlan};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::GenerationBackend;
use crate::error::BedrockError;
use crate::prompts::{self, PromptTemplate};

/// Substituted for absent dietary restrictions.
pub const NO_RESTRICTIONS: &str = "Nenhuma";
/// Substituted for absent meal preferences.
pub const NO_PREFERENCES: &str = "N/A";

fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Input of an operation: the required text fields it must carry.
pub trait GenerationInput: Serialize {
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    fn check(&self) -> Result<(), BedrockError> {
        for (field, value) in self.required_fields() {
            if value.trim().is_empty() {
                return Err(BedrockError::InvalidInput {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanInput {
    pub goal: String,
    pub experience_level: String,
    pub available_time: String,
    pub equipment_available: String,
}

impl GenerationInput for WorkoutPlanInput {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("goal", self.goal.as_str()),
            ("experienceLevel", self.experience_level.as_str()),
            ("availableTime", self.available_time.as_str()),
            ("equipmentAvailable", self.equipment_available.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestionsInput {
    pub objective: String,
    pub dietary_restrictions: String,
    pub preferences: String,
    pub weekly_availability: String,
}

impl MealSuggestionsInput {
    /// Build the input, substituting the defaults for absent
    /// restrictions and preferences.
    pub fn new(
        objective: impl Into<String>,
        dietary_restrictions: Option<&str>,
        preferences: Option<&str>,
        weekly_availability: impl Into<String>,
    ) -> Self {
        Self {
            objective: objective.into(),
            dietary_restrictions: or_default(dietary_restrictions, NO_RESTRICTIONS),
            preferences: or_default(preferences, NO_PREFERENCES),
            weekly_availability: weekly_availability.into(),
        }
    }
}

impl GenerationInput for MealSuggestionsInput {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("objective", self.objective.as_str()),
            ("dietaryRestrictions", self.dietary_restrictions.as_str()),
            ("preferences", self.preferences.as_str()),
            ("weeklyAvailability", self.weekly_availability.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    pub workout_logs: String,
    pub nutrition_logs: String,
    pub user_profile: String,
}

impl GenerationInput for ProgressInput {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("workoutLogs", self.workout_logs.as_str()),
            ("nutritionLogs", self.nutrition_logs.as_str()),
            ("userProfile", self.user_profile.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantInput {
    pub query: String,
}

impl GenerationInput for AssistantInput {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("query", self.query.as_str())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
}

/// Generation operations over a [`GenerationBackend`].
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub async fn generate_workout_plan(
        &self,
        input: &WorkoutPlanInput,
    ) -> Result<WorkoutPlan, BedrockError> {
        self.dispatch(&prompts::WORKOUT_PLAN, input).await
    }

    pub async fn generate_meal_suggestions(
        &self,
        input: &MealSuggestionsInput,
    ) -> Result<MealPlan, BedrockError> {
        self.dispatch(&prompts::MEAL_SUGGESTIONS, input).await
    }

    pub async fn analyze_progress(
        &self,
        input: &ProgressInput,
    ) -> Result<ProgressFeedback, BedrockError> {
        self.dispatch(&prompts::PROGRESS_FEEDBACK, input).await
    }

    pub async fn assistant_reply(
        &self,
        input: &AssistantInput,
    ) -> Result<AssistantReply, BedrockError> {
        self.dispatch(&prompts::ASSISTANT, input).await
    }

    async fn dispatch<I, O>(&self, template: &PromptTemplate, input: &I) -> Result<O, BedrockError>
    where
        I: GenerationInput,
        O: DeserializeOwned,
    {
        input.check()?;
        let json = serde_json::to_value(input)?;

        debug!(template = template.name, "dispatching generation");
        let output = self.backend.invoke(template, &json).await?;

        serde_json::from_value(output).map_err(|e| {
            warn!(template = template.name, error = %e, "generation output rejected");
            BedrockError::SchemaViolation(format!("{}: {e}", template.name))
        })
    }
}
