use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT validation middleware.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the
/// JWT against the user pool's signing keys. On success, inserts the
/// `CurrentUser` into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = {
        let auth_header = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        state.tokens.authenticate(token)?
    };

    req.extensions_mut().insert(user.clone());

    let mut response = next.run(req).await;
    // Picked up by the audit log.
    response.extensions_mut().insert(user);
    Ok(response)
}
