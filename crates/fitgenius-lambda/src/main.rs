use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fitgenius_auth::jwt::TokenValidator;
use fitgenius_bedrock::backend::BedrockBackend;
use fitgenius_lambda::config::AppConfig;
use fitgenius_lambda::state::AppState;
use fitgenius_storage::documents::S3DocumentStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        bucket = %config.bucket,
        region = %config.region,
        model = %config.bedrock_model_id,
        guardrail = config.guardrail.is_some(),
        allow_force = config.allow_force,
        "starting fitgenius api"
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;

    let documents = S3DocumentStore::new(
        fitgenius_storage::client::client_from_config(&sdk_config),
        config.bucket.clone(),
    );

    let mut backend = BedrockBackend::new(
        fitgenius_bedrock::client::client_from_config(&sdk_config),
        config.bedrock_model_id.clone(),
    );
    if let Some(guardrail) = &config.guardrail {
        backend = backend.with_guardrail(guardrail);
    }

    let tokens = TokenValidator::fetch(
        &config.region,
        &config.cognito_user_pool_id,
        &config.cognito_client_id,
    )
    .await?;

    let state = AppState::new(
        Arc::new(documents),
        Arc::new(backend),
        tokens,
        fitgenius_auth::client::client_from_config(&sdk_config),
        &config,
    );

    let app = fitgenius_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
