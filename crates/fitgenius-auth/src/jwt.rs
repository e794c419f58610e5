use std::collections::HashMap;

use fitgenius_core::doc_paths;
use fitgenius_core::models::user::CurrentUser;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AuthError;

/// Claims extracted from a Cognito JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitoClaims {
    pub sub: String,
    pub iss: String,
    pub token_use: String,
    pub exp: u64,
    pub iat: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "cognito:username")]
    pub username: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl CognitoClaims {
    /// The authenticated user. The subject becomes the storage key, so
    /// it must be usable as a single path segment.
    pub fn current_user(&self) -> Result<CurrentUser, AuthError> {
        if !doc_paths::is_valid_user_id(&self.sub) {
            return Err(AuthError::InvalidToken(format!(
                "subject is not a valid user id: {:?}",
                self.sub
            )));
        }
        Ok(CurrentUser {
            id: self.sub.clone(),
            display_name: self.name.clone().or_else(|| self.username.clone()),
            email: self.email.clone(),
        })
    }
}

pub fn cognito_issuer(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}")
}

/// Validates bearer tokens against a fixed set of signing keys.
pub struct TokenValidator {
    keys: HashMap<String, DecodingKey>,
    validation: Validation,
    client_id: String,
}

impl TokenValidator {
    /// Validator over explicit keys, by key id.
    pub fn new(
        keys: impl IntoIterator<Item = (String, DecodingKey)>,
        algorithm: Algorithm,
        issuer: &str,
        client_id: &str,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        // ID tokens carry `aud`; access tokens carry `client_id` instead.
        validation.set_audience(&[client_id]);
        validation.validate_exp = true;

        Self {
            keys: keys.into_iter().collect(),
            validation,
            client_id: client_id.to_string(),
        }
    }

    /// RS256 validator over the keys of a JWKS document.
    pub fn from_jwks(jwks: &JwkSet, issuer: &str, client_id: &str) -> Result<Self, AuthError> {
        let mut keys = Vec::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            keys.push((kid, DecodingKey::from_jwk(jwk)?));
        }
        Ok(Self::new(keys, Algorithm::RS256, issuer, client_id))
    }

    /// Fetch the user pool's JWKS and build a validator from it.
    pub async fn fetch(region: &str, user_pool_id: &str, client_id: &str) -> Result<Self, AuthError> {
        let issuer = cognito_issuer(region, user_pool_id);
        let url = format!("{issuer}/.well-known/jwks.json");

        let jwks = tokio::task::spawn_blocking(move || -> Result<JwkSet, AuthError> {
            ureq::get(&url)
                .call()
                .map_err(|e| AuthError::Jwks(e.to_string()))?
                .body_mut()
                .read_json::<JwkSet>()
                .map_err(|e| AuthError::Jwks(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Jwks(e.to_string()))??;

        info!(keys = jwks.keys.len(), user_pool_id, "loaded signing keys");
        Self::from_jwks(&jwks, &issuer, client_id)
    }

    pub fn validate(&self, token: &str) -> Result<CognitoClaims, AuthError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".to_string()))?;
        let key = self
            .keys
            .get(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;

        let token_data = decode::<CognitoClaims>(token, key, &self.validation)?;
        let claims = token_data.claims;

        // Verify token_use is "access" or "id"
        match claims.token_use.as_str() {
            "id" => {}
            "access" => {
                if claims.client_id.as_deref() != Some(self.client_id.as_str()) {
                    return Err(AuthError::InvalidToken(
                        "access token issued to another client".to_string(),
                    ));
                }
            }
            other => {
                return Err(AuthError::InvalidToken(format!(
                    "unexpected token_use: {other}"
                )));
            }
        }

        Ok(claims)
    }

    /// Validate a token and resolve the user it was issued to.
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        self.validate(token)?.current_user()
    }
}
