//! State of a mounted plan view.
//!
//! A view subscribes to the identity context when it mounts and drops
//! the subscription when it unmounts. Generation started from a view runs
//! to completion (including persistence) regardless of the view, but its
//! result only lands in the view's state while the view is alive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use fitgenius_auth::identity::{IdentityContext, IdentityEvent, IdentitySubscription};
use fitgenius_core::models::outcome::PlanOutcome;
use fitgenius_core::models::plan::PlanType;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::workflow::{PlanRequest, PlanWorkflow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub outcome: Option<PlanOutcome>,
    pub redirect_to_login: bool,
}

pub struct PlanView {
    user_id: String,
    plan_type: PlanType,
    state: Arc<Mutex<ViewState>>,
    identity: IdentitySubscription,
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlanView {
    pub fn mount(identity: &IdentityContext, user_id: impl Into<String>, plan_type: PlanType) -> Self {
        let user_id = user_id.into();
        debug!(user_id, %plan_type, "plan view mounted");
        Self {
            user_id,
            plan_type,
            state: Arc::new(Mutex::new(ViewState::default())),
            identity: identity.subscribe(),
        }
    }

    pub fn plan_type(&self) -> PlanType {
        self.plan_type
    }

    pub fn snapshot(&self) -> ViewState {
        lock(&self.state).clone()
    }

    /// Start a generation in the background. The returned handle resolves
    /// once the attempt, persistence included, has finished.
    pub fn generate(&self, workflow: Arc<PlanWorkflow>, request: PlanRequest) -> JoinHandle<PlanOutcome> {
        lock(&self.state).loading = true;

        let view: Weak<Mutex<ViewState>> = Arc::downgrade(&self.state);
        let user_id = self.user_id.clone();

        tokio::spawn(async move {
            let outcome = workflow.run(&user_id, &request).await.into_outcome();

            match view.upgrade() {
                Some(state) => {
                    let mut state = lock(&state);
                    state.loading = false;
                    state.outcome = Some(outcome.clone());
                }
                None => debug!(user_id, "plan view gone, result not shown"),
            }
            outcome
        })
    }

    /// Apply queued identity events. A sign-out of this view's user flags
    /// the view for redirect to the login view.
    pub fn sync_identity(&mut self) -> bool {
        while let Some(event) = self.identity.try_recv() {
            if let IdentityEvent::SignedOut { user_id } = event
                && user_id == self.user_id
            {
                lock(&self.state).redirect_to_login = true;
            }
        }
        lock(&self.state).redirect_to_login
    }

    pub fn unmount(self) {
        debug!(user_id = %self.user_id, plan_type = %self.plan_type, "plan view unmounted");
    }
}
