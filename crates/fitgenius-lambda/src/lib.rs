//! fitgenius-lambda
//!
//! HTTP API for the FitGenius frontend, served from AWS Lambda.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Protected routes
    let protected = Router::new()
        .route(
            "/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route(
            "/plans/{plan_type}",
            get(routes::plans::get_plan).post(routes::plans::generate_plan),
        )
        .route(
            "/assistant/messages",
            get(routes::assistant::list_messages).post(routes::assistant::send_message),
        )
        .route("/session/sign-out", post(routes::session::sign_out))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        // Session (no auth)
        .route("/session/sign-in", post(routes::session::sign_in))
        .route("/session/sign-up", post(routes::session::sign_up))
        .route("/session/refresh", post(routes::session::refresh))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::audit::audit_log)),
        )
        .with_state(state)
}
