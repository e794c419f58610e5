use std::collections::HashMap;

use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType, AuthenticationResultType};
use serde::Serialize;
use tracing::info;

use crate::error::AuthError;

/// Tokens returned by a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: i32,
}

impl AuthTokens {
    fn from_result(result: &AuthenticationResultType, fallback_refresh: Option<&str>) -> Self {
        Self {
            access_token: result.access_token().unwrap_or_default().to_string(),
            id_token: result.id_token().unwrap_or_default().to_string(),
            // Refresh token may not be returned on refresh
            refresh_token: result
                .refresh_token()
                .or(fallback_refresh)
                .unwrap_or_default()
                .to_string(),
            expires_in: result.expires_in(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResult {
    pub user_sub: String,
    pub confirmed: bool,
}

/// Username/password sign-in.
pub async fn sign_in(
    client: &Client,
    user_pool_client_id: &str,
    email: &str,
    password: &str,
) -> Result<AuthTokens, AuthError> {
    info!(username = email, "initiating auth");

    let mut auth_params = HashMap::new();
    auth_params.insert("USERNAME".to_string(), email.to_string());
    auth_params.insert("PASSWORD".to_string(), password.to_string());

    let resp = client
        .initiate_auth()
        .auth_flow(AuthFlowType::UserPasswordAuth)
        .client_id(user_pool_client_id)
        .set_auth_parameters(Some(auth_params))
        .send()
        .await
        .map_err(|e| AuthError::Cognito(e.into_service_error().to_string()))?;

    match (resp.authentication_result(), resp.challenge_name()) {
        (Some(result), _) => Ok(AuthTokens::from_result(result, None)),
        (None, Some(challenge)) => Err(AuthError::AuthFailed(format!(
            "unsupported challenge: {}",
            challenge.as_str()
        ))),
        (None, None) => Err(AuthError::AuthFailed("unexpected response".to_string())),
    }
}

/// Register a new account. The display name is stored as the `name`
/// attribute and ends up in the ID token.
pub async fn sign_up(
    client: &Client,
    user_pool_client_id: &str,
    email: &str,
    password: &str,
    name: &str,
) -> Result<SignUpResult, AuthError> {
    info!(username = email, "signing up");

    let name_attr = AttributeType::builder()
        .name("name")
        .value(name)
        .build()
        .map_err(|e| AuthError::SignUpFailed(e.to_string()))?;
    let email_attr = AttributeType::builder()
        .name("email")
        .value(email)
        .build()
        .map_err(|e| AuthError::SignUpFailed(e.to_string()))?;

    let resp = client
        .sign_up()
        .client_id(user_pool_client_id)
        .username(email)
        .password(password)
        .user_attributes(name_attr)
        .user_attributes(email_attr)
        .send()
        .await
        .map_err(|e| AuthError::SignUpFailed(e.into_service_error().to_string()))?;

    Ok(SignUpResult {
        user_sub: resp.user_sub().to_string(),
        confirmed: resp.user_confirmed(),
    })
}

/// Refresh tokens using a refresh token.
pub async fn refresh(
    client: &Client,
    user_pool_client_id: &str,
    refresh_token: &str,
) -> Result<AuthTokens, AuthError> {
    let mut auth_params = HashMap::new();
    auth_params.insert("REFRESH_TOKEN".to_string(), refresh_token.to_string());

    let resp = client
        .initiate_auth()
        .auth_flow(AuthFlowType::RefreshTokenAuth)
        .client_id(user_pool_client_id)
        .set_auth_parameters(Some(auth_params))
        .send()
        .await
        .map_err(|e| AuthError::Cognito(e.into_service_error().to_string()))?;

    resp.authentication_result()
        .map(|result| AuthTokens::from_result(result, Some(refresh_token)))
        .ok_or_else(|| AuthError::AuthFailed("refresh failed".to_string()))
}
