use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use fitgenius_core::cooldown::{self, CooldownDecision};
use fitgenius_core::models::outcome::{ErrorKind, PlanOutcome};
use fitgenius_core::models::plan::{GeneratedPlan, PlanType};
use fitgenius_core::models::user::CurrentUser;
use fitgenius_planner::workflow::PlanRequest;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: Option<GeneratedPlan>,
    pub cooldown: CooldownDecision,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePlanBody {
    pub preferences: Option<String>,
    pub workout_logs: Option<String>,
    pub nutrition_logs: Option<String>,
    pub force: bool,
}

pub async fn get_plan(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(plan_type): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan_type: PlanType = plan_type.parse()?;
    let plan = state.cache.get(&user.id, plan_type).await?.map(|e| e.plan);
    let cooldown = cooldown::can_regenerate(plan.as_ref(), jiff::Timestamp::now());
    Ok(Json(PlanResponse { plan, cooldown }))
}

pub async fn generate_plan(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(plan_type): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<PlanOutcome>), ApiError> {
    let plan_type: PlanType = plan_type.parse()?;
    // The body is optional; workout plans need none.
    let body: GeneratePlanBody = if body.is_empty() {
        GeneratePlanBody::default()
    } else {
        serde_json::from_slice(&body)?
    };

    if body.force && !state.allow_force {
        return Err(ApiError::Forbidden(
            "forced regeneration is not enabled".to_string(),
        ));
    }

    let request = PlanRequest {
        plan_type,
        preferences: body.preferences,
        workout_logs: body.workout_logs,
        nutrition_logs: body.nutrition_logs,
        force: body.force,
    };

    let outcome = state.workflow.run(&user.id, &request).await.into_outcome();
    Ok((outcome_status(&outcome), Json(outcome)))
}

fn outcome_status(outcome: &PlanOutcome) -> StatusCode {
    match outcome {
        PlanOutcome::Ok { .. } => StatusCode::OK,
        PlanOutcome::Blocked { .. } => StatusCode::TOO_MANY_REQUESTS,
        PlanOutcome::Error { error, .. } => match error {
            ErrorKind::ProfileIncomplete => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::CooldownActive => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Generation => StatusCode::BAD_GATEWAY,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}
