use std::num::NonZeroUsize;
use std::sync::Arc;

use fitgenius_core::doc_paths;
use fitgenius_core::models::plan::{self, GeneratedPlan, PlanType};
use fitgenius_storage::documents::{self, DocumentStore, SetOptions};
use fitgenius_storage::error::StorageError;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Which tier served a cache read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Session,
    Durable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub plan: GeneratedPlan,
    pub tier: CacheTier,
}

type SessionKey = (String, PlanType);

/// Two-tier plan cache: a process-local session tier in front of the
/// durable document store.
///
/// Writes go to both tiers. Display reads are served from the session
/// tier first; cooldown decisions read the durable tier, which every
/// instance shares. The session tier holds at most `capacity` plans and
/// drops the least recently used one beyond that.
pub struct PlanCache {
    session: Mutex<LruCache<SessionKey, GeneratedPlan>>,
    durable: Arc<dyn DocumentStore>,
}

impl PlanCache {
    pub const DEFAULT_SESSION_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(durable: Arc<dyn DocumentStore>) -> Self {
        Self::with_capacity(durable, Self::DEFAULT_SESSION_CAPACITY)
    }

    pub fn with_capacity(durable: Arc<dyn DocumentStore>, capacity: NonZeroUsize) -> Self {
        Self {
            session: Mutex::new(LruCache::new(capacity)),
            durable,
        }
    }

    /// Look a plan up, session tier first.
    ///
    /// Durable records are migrated to the current plan shape on read. A
    /// durable read failure is returned, not treated as a miss.
    pub async fn get(
        &self,
        user_id: &str,
        plan_type: PlanType,
    ) -> Result<Option<CacheEntry>, StorageError> {
        let key = (user_id.to_string(), plan_type);

        if let Some(plan) = self.session.lock().await.get(&key) {
            debug!(user_id, %plan_type, "plan served from session tier");
            return Ok(Some(CacheEntry {
                plan: plan.clone(),
                tier: CacheTier::Session,
            }));
        }

        let Some(plan) = self.read_durable(user_id, plan_type).await? else {
            return Ok(None);
        };

        debug!(user_id, %plan_type, "plan served from durable tier");
        self.session.lock().await.put(key, plan.clone());

        Ok(Some(CacheEntry {
            plan,
            tier: CacheTier::Durable,
        }))
    }

    /// The newest plan known anywhere, durable tier first.
    ///
    /// Another instance may have written a newer plan than this
    /// process's session copy, so the durable record wins and replaces
    /// the session copy. The session copy is only used when it is newer
    /// than the durable record, which happens after a failed durable
    /// write.
    pub async fn get_latest(
        &self,
        user_id: &str,
        plan_type: PlanType,
    ) -> Result<Option<CacheEntry>, StorageError> {
        let durable = self.read_durable(user_id, plan_type).await?;
        let key = (user_id.to_string(), plan_type);
        let mut session = self.session.lock().await;

        let local = session.get(&key).cloned();

        match (durable, local) {
            (Some(stored), Some(local)) if local.created_at() > stored.created_at() => {
                debug!(user_id, %plan_type, "session copy is newer than durable record");
                Ok(Some(CacheEntry {
                    plan: local,
                    tier: CacheTier::Session,
                }))
            }
            (Some(stored), _) => {
                session.put(key, stored.clone());
                Ok(Some(CacheEntry {
                    plan: stored,
                    tier: CacheTier::Durable,
                }))
            }
            (None, Some(local)) => Ok(Some(CacheEntry {
                plan: local,
                tier: CacheTier::Session,
            })),
            (None, None) => Ok(None),
        }
    }

    async fn read_durable(
        &self,
        user_id: &str,
        plan_type: PlanType,
    ) -> Result<Option<GeneratedPlan>, StorageError> {
        let path = doc_paths::plan(user_id, plan_type);
        let Some(raw) = self.durable.get(&path).await? else {
            return Ok(None);
        };
        plan::migrate_plan(raw, plan_type)
            .map(Some)
            .map_err(|e| StorageError::InvalidDocument {
                path,
                reason: e.to_string(),
            })
    }

    /// Store a plan in both tiers, replacing whatever was there.
    ///
    /// A durable write failure is logged and swallowed; the session tier
    /// still holds the plan. Returns whether the durable write succeeded.
    pub async fn put(&self, user_id: &str, plan: GeneratedPlan) -> bool {
        let plan_type = plan.plan_type();
        let path = doc_paths::plan(user_id, plan_type);

        let durable = documents::set_json(self.durable.as_ref(), &path, &plan, SetOptions::REPLACE).await;

        self.session
            .lock()
            .await
            .put((user_id.to_string(), plan_type), plan);

        match durable {
            Ok(()) => {
                debug!(user_id, %plan_type, "plan written to both tiers");
                true
            }
            Err(e) => {
                warn!(
                    user_id,
                    %plan_type,
                    error = %e,
                    "failed to write plan to durable store (session copy is kept)"
                );
                false
            }
        }
    }

    /// Drop one session-tier entry. The durable record is untouched.
    pub async fn evict_session(&self, user_id: &str, plan_type: PlanType) -> bool {
        self.session
            .lock()
            .await
            .pop(&(user_id.to_string(), plan_type))
            .is_some()
    }

    /// Drop every session-tier entry of a user. Returns how many went.
    pub async fn clear_user(&self, user_id: &str) -> usize {
        let mut session = self.session.lock().await;
        let mut removed = 0;
        for plan_type in PlanType::ALL {
            if session.pop(&(user_id.to_string(), plan_type)).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub async fn session_len(&self) -> usize {
        self.session.lock().await.len()
    }
}
