use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use fitgenius_core::models::profile::{FieldIssue, ProfileDocument};
use fitgenius_core::models::user::CurrentUser;

use crate::error::ApiError;
use crate::state::AppState;

/// The stored profile plus whatever still blocks plan generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: ProfileDocument,
    pub complete: bool,
    pub issues: Vec<FieldIssue>,
}

impl From<ProfileDocument> for ProfileResponse {
    fn from(profile: ProfileDocument) -> Self {
        let issues = profile.issues();
        Self {
            complete: issues.is_empty(),
            issues,
            profile,
        }
    }
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profiles.ensure(&user).await?;
    Ok(Json(profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(form): Json<ProfileDocument>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = form.validate()?;
    let saved = state.profiles.save(&user.id, &profile).await?;
    Ok(Json(saved.into()))
}
