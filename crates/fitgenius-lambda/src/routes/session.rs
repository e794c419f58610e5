use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use fitgenius_auth::flows::{self, AuthTokens, SignUpResult};
use fitgenius_core::models::user::CurrentUser;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    pub refresh_token: String,
}

/// Sign in and make sure the user has a profile record.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInBody>,
) -> Result<Json<AuthTokens>, ApiError> {
    let tokens = flows::sign_in(
        &state.cognito,
        &state.cognito_client_id,
        body.email.trim(),
        &body.password,
    )
    .await?;

    let user = state.tokens.authenticate(&tokens.id_token)?;
    state.profiles.ensure(&user).await?;
    state.identity.signed_in(user);

    Ok(Json(tokens))
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpBody>,
) -> Result<Json<SignUpResult>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let result = flows::sign_up(
        &state.cognito,
        &state.cognito_client_id,
        body.email.trim(),
        &body.password,
        name,
    )
    .await?;

    Ok(Json(result))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<AuthTokens>, ApiError> {
    let tokens = flows::refresh(&state.cognito, &state.cognito_client_id, &body.refresh_token).await?;
    Ok(Json(tokens))
}

/// Publish the sign-out. Session-scoped state of the user is dropped by
/// the identity listener.
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> StatusCode {
    state.identity.signed_out(user.id);
    StatusCode::NO_CONTENT
}
