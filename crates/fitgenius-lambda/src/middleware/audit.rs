use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use fitgenius_core::models::user::CurrentUser;

/// Audit logging middleware.
///
/// Logs every API request as a structured event using `tracing`,
/// including the caller when the request was authenticated.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let user_id = response
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.id.clone());
    tracing::info!(
        method = %method,
        path = %uri,
        status = status,
        user_id = user_id.as_deref(),
        "api_request"
    );

    response
}
