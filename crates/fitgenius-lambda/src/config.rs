use std::env;

use fitgenius_bedrock::backend::Guardrail;

const DEFAULT_BUCKET: &str = "fitgenius";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bucket: String,
    pub cognito_user_pool_id: String,
    pub cognito_client_id: String,
    pub region: String,
    pub bedrock_model_id: String,
    pub guardrail: Option<Guardrail>,
    /// Honour `force` on plan generation requests.
    pub allow_force: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let guardrail = match (var("BEDROCK_GUARDRAIL_ID"), var("BEDROCK_GUARDRAIL_VERSION")) {
            (Some(identifier), Some(version)) => Some(Guardrail {
                identifier,
                version,
            }),
            (Some(identifier), None) => {
                tracing::warn!(identifier, "BEDROCK_GUARDRAIL_VERSION not set, guardrail disabled");
                None
            }
            _ => None,
        };

        Self {
            bucket: or("FITGENIUS_BUCKET", DEFAULT_BUCKET),
            cognito_user_pool_id: or("COGNITO_USER_POOL_ID", "us-east-1_placeholder"),
            cognito_client_id: or("COGNITO_CLIENT_ID", "placeholder"),
            region: or("AWS_REGION", DEFAULT_REGION),
            bedrock_model_id: or("BEDROCK_MODEL_ID", DEFAULT_MODEL_ID),
            guardrail,
            allow_force: var("FITGENIUS_ALLOW_FORCE").is_some_and(|v| is_truthy(&v)),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
