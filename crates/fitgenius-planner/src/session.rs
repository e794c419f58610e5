use std::sync::Arc;

use fitgenius_auth::identity::{IdentityContext, IdentityEvent};
use tokio::task::JoinHandle;
use tracing::info;

use crate::assistant::ChatSessions;
use crate::cache::PlanCache;

/// Drop session-scoped state (session-tier plans, chat transcript) of
/// every user that signs out. Runs until the identity context is gone.
pub fn spawn_sign_out_cleanup(
    identity: &IdentityContext,
    cache: Arc<PlanCache>,
    chats: Arc<ChatSessions>,
) -> JoinHandle<()> {
    let mut events = identity.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let IdentityEvent::SignedOut { user_id } = event {
                let plans = cache.clear_user(&user_id).await;
                let chat = chats.remove(&user_id).await;
                info!(user_id, plans, chat, "session state cleared after sign-out");
            }
        }
    })
}
