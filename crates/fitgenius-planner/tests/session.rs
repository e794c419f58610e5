use std::sync::Arc;
use std::time::Duration;

use fitgenius_auth::identity::IdentityContext;
use fitgenius_core::models::plan::PlanType;
use fitgenius_planner::assistant::ChatSessions;
use fitgenius_planner::cache::{CacheTier, PlanCache};
use fitgenius_planner::session::spawn_sign_out_cleanup;
use fitgenius_storage::documents::MemoryDocumentStore;
use fitgenius_test_utils::workout_generated_at;

#[tokio::test]
async fn sign_out_clears_session_state_of_that_user() {
    let identity = IdentityContext::new();
    let cache = Arc::new(PlanCache::new(Arc::new(MemoryDocumentStore::new())));
    let chats = Arc::new(ChatSessions::new());

    let at = "2025-03-10T12:00:00Z".parse().unwrap();
    cache.put("user-1", workout_generated_at(at)).await;
    cache.put("user-2", workout_generated_at(at)).await;
    chats.session("user-1").await;
    chats.session("user-2").await;

    let _task = spawn_sign_out_cleanup(&identity, cache.clone(), chats.clone());
    identity.signed_out("user-1");

    for _ in 0..100 {
        if cache.session_len().await == 1 && chats.len().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(cache.session_len().await, 1);
    assert_eq!(chats.len().await, 1);

    // The durable copy is still there.
    let entry = cache.get("user-1", PlanType::Workout).await.unwrap().unwrap();
    assert_eq!(entry.tier, CacheTier::Durable);
}
