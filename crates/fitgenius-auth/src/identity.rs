//! Session lifecycle events.
//!
//! Components that depend on the signed-in user subscribe to an
//! [`IdentityContext`] and react to [`IdentityEvent`]s. A subscription
//! is a guard: dropping it unsubscribes.

use fitgenius_core::models::user::CurrentUser;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(CurrentUser),
    SignedOut { user_id: String },
}

impl IdentityEvent {
    pub fn user_id(&self) -> &str {
        match self {
            Self::SignedIn(user) => &user.id,
            Self::SignedOut { user_id } => user_id,
        }
    }
}

/// Publishes identity events to every live subscription.
#[derive(Clone)]
pub struct IdentityContext {
    sender: broadcast::Sender<IdentityEvent>,
}

impl Default for IdentityContext {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityContext {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn signed_in(&self, user: CurrentUser) {
        self.publish(IdentityEvent::SignedIn(user));
    }

    pub fn signed_out(&self, user_id: impl Into<String>) {
        self.publish(IdentityEvent::SignedOut {
            user_id: user_id.into(),
        });
    }

    fn publish(&self, event: IdentityEvent) {
        let user_id = event.user_id().to_string();
        match self.sender.send(event) {
            Ok(receivers) => debug!(user_id, receivers, "identity event published"),
            Err(_) => debug!(user_id, "identity event dropped, no subscribers"),
        }
    }
}

/// A live subscription. Unsubscribes on drop.
pub struct IdentitySubscription {
    receiver: broadcast::Receiver<IdentityEvent>,
}

impl IdentitySubscription {
    /// Wait for the next event. `None` once the context is gone.
    pub async fn recv(&mut self) -> Option<IdentityEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "identity subscription lagged, events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<IdentityEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "identity subscription lagged, events skipped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
