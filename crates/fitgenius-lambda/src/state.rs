use std::sync::Arc;

use aws_sdk_cognitoidentityprovider::Client as CognitoClient;

use fitgenius_auth::identity::IdentityContext;
use fitgenius_auth::jwt::TokenValidator;
use fitgenius_bedrock::backend::GenerationBackend;
use fitgenius_bedrock::generation::GenerationClient;
use fitgenius_planner::assistant::ChatSessions;
use fitgenius_planner::cache::PlanCache;
use fitgenius_planner::session;
use fitgenius_planner::workflow::PlanWorkflow;
use fitgenius_storage::documents::DocumentStore;
use fitgenius_storage::profiles::ProfileStore;

use crate::config::AppConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    pub cache: Arc<PlanCache>,
    pub workflow: Arc<PlanWorkflow>,
    pub generator: GenerationClient,
    pub chats: Arc<ChatSessions>,
    pub identity: IdentityContext,
    pub tokens: Arc<TokenValidator>,
    pub cognito: CognitoClient,
    pub cognito_client_id: String,
    pub allow_force: bool,
}

impl AppState {
    /// Wire the services together. Must run inside a tokio runtime: the
    /// sign-out cleanup task is spawned here.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        backend: Arc<dyn GenerationBackend>,
        tokens: TokenValidator,
        cognito: CognitoClient,
        config: &AppConfig,
    ) -> Self {
        let profiles = ProfileStore::new(documents.clone());
        let cache = Arc::new(PlanCache::new(documents));
        let generator = GenerationClient::new(backend);
        let workflow = Arc::new(PlanWorkflow::new(
            profiles.clone(),
            cache.clone(),
            generator.clone(),
        ));
        let chats = Arc::new(ChatSessions::new());
        let identity = IdentityContext::new();

        session::spawn_sign_out_cleanup(&identity, cache.clone(), chats.clone());

        Self {
            profiles,
            cache,
            workflow,
            generator,
            chats,
            identity,
            tokens: Arc::new(tokens),
            cognito,
            cognito_client_id: config.cognito_client_id.clone(),
            allow_force: config.allow_force,
        }
    }
}
