use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("sign-up failed: {0}")]
    SignUpFailed(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Cognito error: {0}")]
    Cognito(String),

    #[error("JWKS fetch failed: {0}")]
    Jwks(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
