use std::time::{SystemTime, UNIX_EPOCH};

use fitgenius_auth::error::AuthError;
use fitgenius_auth::jwt::{TokenValidator, cognito_issuer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, encode};
use serde_json::{Value, json};

const SECRET: &[u8] = b"test-signing-secret";
const CLIENT_ID: &str = "client-abc";

fn issuer() -> String {
    cognito_issuer("us-east-1", "us-east-1_pool")
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn validator() -> TokenValidator {
    TokenValidator::new(
        [("k1".to_string(), DecodingKey::from_secret(SECRET))],
        Algorithm::HS256,
        &issuer(),
        CLIENT_ID,
    )
}

fn sign(kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn id_claims() -> Value {
    json!({
        "sub": "5f1c-user",
        "iss": issuer(),
        "aud": CLIENT_ID,
        "token_use": "id",
        "iat": now(),
        "exp": now() + 3600,
        "email": "ana@example.com",
        "name": "Ana Souza",
        "cognito:username": "ana",
    })
}

#[test]
fn id_token_resolves_current_user() {
    let user = validator().authenticate(&sign("k1", &id_claims())).unwrap();
    assert_eq!(user.id, "5f1c-user");
    assert_eq!(user.display_name.as_deref(), Some("Ana Souza"));
    assert_eq!(user.email.as_deref(), Some("ana@example.com"));
}

#[test]
fn access_token_must_belong_to_client() {
    let mut claims = json!({
        "sub": "5f1c-user",
        "iss": issuer(),
        "token_use": "access",
        "client_id": CLIENT_ID,
        "username": "ana",
        "iat": now(),
        "exp": now() + 3600,
    });
    let user = validator().authenticate(&sign("k1", &claims)).unwrap();
    assert_eq!(user.display_name.as_deref(), Some("ana"));

    claims["client_id"] = json!("someone-else");
    let err = validator().validate(&sign("k1", &claims)).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[test]
fn expired_token_is_rejected() {
    let mut claims = id_claims();
    claims["exp"] = json!(now() - 3600);
    let err = validator().validate(&sign("k1", &claims)).unwrap_err();
    assert!(matches!(err, AuthError::Jwt(_)));
}

#[test]
fn wrong_issuer_is_rejected() {
    let mut claims = id_claims();
    claims["iss"] = json!(cognito_issuer("us-east-1", "other-pool"));
    assert!(validator().validate(&sign("k1", &claims)).is_err());
}

#[test]
fn unknown_kid_is_rejected() {
    let err = validator().validate(&sign("k2", &id_claims())).unwrap_err();
    assert!(matches!(err, AuthError::UnknownKey(kid) if kid == "k2"));
}

#[test]
fn refresh_token_use_is_rejected() {
    let mut claims = id_claims();
    claims["token_use"] = json!("refresh");
    let err = validator().validate(&sign("k1", &claims)).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[test]
fn subject_must_be_a_single_path_segment() {
    let mut claims = id_claims();
    claims["sub"] = json!("../admin");
    let err = validator().authenticate(&sign("k1", &claims)).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}
