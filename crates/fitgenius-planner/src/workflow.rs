//! Plan generation workflow.
//!
//! One attempt walks `Idle → ValidatingProfile → CheckingCooldown →
//! Generating → Persisting → Done`, and any step may end in `Failed`.
//! Only a validated profile reaches the generation backend, and an
//! attempt blocked by the cooldown never touches either cache tier.

use std::fmt;
use std::sync::Arc;

use fitgenius_bedrock::generation::{
    GenerationClient, MealSuggestionsInput, ProgressInput, WorkoutPlanInput,
};
use fitgenius_core::cooldown;
use fitgenius_core::error::CoreError;
use fitgenius_core::models::outcome::PlanOutcome;
use fitgenius_core::models::plan::{GeneratedPlan, PlanBody, PlanType};
use fitgenius_core::models::profile::UserProfile;
use fitgenius_storage::profiles::ProfileStore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::PlanCache;
use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    ValidatingProfile,
    CheckingCooldown,
    Generating,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ValidatingProfile => "validating_profile",
            Self::CheckingCooldown => "checking_cooldown",
            Self::Generating => "generating",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A request to generate one plan.
///
/// Workout plans need nothing beyond the profile. Meal plans may carry
/// free-text preferences; progress feedback needs both logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub plan_type: PlanType,
    pub preferences: Option<String>,
    pub workout_logs: Option<String>,
    pub nutrition_logs: Option<String>,
    /// Skip the cooldown check.
    pub force: bool,
}

impl PlanRequest {
    pub fn new(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            preferences: None,
            workout_logs: None,
            nutrition_logs: None,
            force: false,
        }
    }

    pub fn workout() -> Self {
        Self::new(PlanType::Workout)
    }

    pub fn meal(preferences: Option<String>) -> Self {
        Self {
            preferences,
            ..Self::new(PlanType::Meal)
        }
    }

    pub fn progress(workout_logs: impl Into<String>, nutrition_logs: impl Into<String>) -> Self {
        Self {
            workout_logs: Some(workout_logs.into()),
            nutrition_logs: Some(nutrition_logs.into()),
            ..Self::new(PlanType::Progress)
        }
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// The result of one workflow run and the states it went through.
#[derive(Debug)]
pub struct Attempt {
    trail: Vec<WorkflowState>,
    result: Result<GeneratedPlan, WorkflowError>,
}

impl Attempt {
    pub fn trail(&self) -> &[WorkflowState] {
        &self.trail
    }

    /// The terminal state: `Done` or `Failed`.
    pub fn state(&self) -> WorkflowState {
        self.trail.last().copied().unwrap_or(WorkflowState::Idle)
    }

    pub fn result(&self) -> &Result<GeneratedPlan, WorkflowError> {
        &self.result
    }

    pub fn into_result(self) -> Result<GeneratedPlan, WorkflowError> {
        self.result
    }

    pub fn into_outcome(self) -> PlanOutcome {
        match self.result {
            Ok(plan) => PlanOutcome::Ok { ok: plan },
            Err(WorkflowError::CooldownActive { days_remaining }) => PlanOutcome::Blocked {
                blocked: days_remaining,
            },
            Err(e) => PlanOutcome::Error {
                error: e.kind(),
                message: e.user_message(),
            },
        }
    }
}

/// Records and logs the states of one attempt.
struct Trail<'a> {
    user_id: &'a str,
    plan_type: PlanType,
    states: Vec<WorkflowState>,
}

impl<'a> Trail<'a> {
    fn new(user_id: &'a str, plan_type: PlanType) -> Self {
        Self {
            user_id,
            plan_type,
            states: vec![WorkflowState::Idle],
        }
    }

    fn enter(&mut self, state: WorkflowState) {
        let from = self.states.last().copied().unwrap_or(WorkflowState::Idle);
        info!(
            user_id = self.user_id,
            plan_type = %self.plan_type,
            %from,
            to = %state,
            "plan workflow transition"
        );
        self.states.push(state);
    }
}

/// Runs plan generation attempts against the profile store, the plan
/// cache and the generation client.
pub struct PlanWorkflow {
    profiles: ProfileStore,
    cache: Arc<PlanCache>,
    generator: GenerationClient,
}

impl PlanWorkflow {
    pub fn new(profiles: ProfileStore, cache: Arc<PlanCache>, generator: GenerationClient) -> Self {
        Self {
            profiles,
            cache,
            generator,
        }
    }

    pub fn cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    pub async fn run(&self, user_id: &str, request: &PlanRequest) -> Attempt {
        self.run_at(user_id, request, jiff::Timestamp::now()).await
    }

    /// Run one attempt as of `now`. `now` becomes the plan's creation time.
    pub async fn run_at(
        &self,
        user_id: &str,
        request: &PlanRequest,
        now: jiff::Timestamp,
    ) -> Attempt {
        let mut trail = Trail::new(user_id, request.plan_type);
        let result = self.execute(&mut trail, user_id, request, now).await;

        match &result {
            Ok(_) => trail.enter(WorkflowState::Done),
            Err(e) => {
                warn!(user_id, plan_type = %request.plan_type, error = %e, "plan workflow failed");
                trail.enter(WorkflowState::Failed);
            }
        }

        Attempt {
            trail: trail.states,
            result,
        }
    }

    async fn execute(
        &self,
        trail: &mut Trail<'_>,
        user_id: &str,
        request: &PlanRequest,
        now: jiff::Timestamp,
    ) -> Result<GeneratedPlan, WorkflowError> {
        trail.enter(WorkflowState::ValidatingProfile);
        let profile = self.load_profile(user_id).await?;

        if request.force {
            info!(user_id, plan_type = %request.plan_type, "cooldown check skipped by request");
        } else {
            trail.enter(WorkflowState::CheckingCooldown);
            let existing = self.cache.get_latest(user_id, request.plan_type).await?;
            let decision = cooldown::can_regenerate(existing.as_ref().map(|e| &e.plan), now);
            if !decision.allowed {
                return Err(WorkflowError::CooldownActive {
                    days_remaining: decision.days_remaining,
                });
            }
        }

        trail.enter(WorkflowState::Generating);
        let body = self.generate(&profile, request).await?;

        trail.enter(WorkflowState::Persisting);
        let plan = GeneratedPlan::new(body, now);
        self.cache.put(user_id, plan.clone()).await;

        Ok(plan)
    }

    async fn load_profile(&self, user_id: &str) -> Result<UserProfile, WorkflowError> {
        let stored = self.profiles.load(user_id).await?.unwrap_or_default();
        stored.validate().map_err(|e| match e {
            CoreError::ProfileIncomplete(issues) => WorkflowError::ProfileIncomplete(issues),
            other => WorkflowError::Validation(other.to_string()),
        })
    }

    async fn generate(
        &self,
        profile: &UserProfile,
        request: &PlanRequest,
    ) -> Result<PlanBody, WorkflowError> {
        let body = match request.plan_type {
            PlanType::Workout => {
                let input = WorkoutPlanInput {
                    goal: profile.goal.clone(),
                    experience_level: profile.experience_level.clone(),
                    available_time: profile.weekly_availability.clone(),
                    equipment_available: profile.equipment_available.clone(),
                };
                PlanBody::Workout(self.generator.generate_workout_plan(&input).await?)
            }
            PlanType::Meal => {
                let input = MealSuggestionsInput::new(
                    profile.goal.clone(),
                    profile.dietary_restrictions.as_deref(),
                    request.preferences.as_deref(),
                    profile.weekly_availability.clone(),
                );
                PlanBody::Meal(self.generator.generate_meal_suggestions(&input).await?)
            }
            PlanType::Progress => {
                let input = ProgressInput {
                    workout_logs: request.workout_logs.clone().unwrap_or_default(),
                    nutrition_logs: request.nutrition_logs.clone().unwrap_or_default(),
                    user_profile: profile.summary(),
                };
                PlanBody::Progress(self.generator.analyze_progress(&input).await?)
            }
        };
        Ok(body)
    }
}
