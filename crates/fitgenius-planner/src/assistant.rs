//! Session-scoped assistant chat.
//!
//! Transcripts are kept per user in process memory and are never
//! persisted. Only the most recently used sessions are kept.

use std::num::NonZeroUsize;
use std::sync::Arc;

use fitgenius_bedrock::error::BedrockError;
use fitgenius_bedrock::generation::{AssistantInput, GenerationClient};
use fitgenius_core::models::chat::ChatMessage;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const GREETING: &str =
    "Olá! Sou seu assistente virtual. Como posso te ajudar hoje com seus treinos ou dieta?";

/// One user's conversation, seeded with the greeting.
#[derive(Debug, Clone)]
pub struct AssistantSession {
    messages: Vec<ChatMessage>,
}

impl Default for AssistantSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a query and append the reply.
    ///
    /// The user message is appended before the call and taken back out
    /// if the call fails, so a failed send leaves the transcript as it was.
    pub async fn send(
        &mut self,
        generator: &GenerationClient,
        query: &str,
    ) -> Result<ChatMessage, BedrockError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(BedrockError::InvalidInput {
                field: "query",
                reason: "must not be empty".to_string(),
            });
        }

        self.messages.push(ChatMessage::user(query));

        let input = AssistantInput {
            query: query.to_string(),
        };
        match generator.assistant_reply(&input).await {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply.response);
                self.messages.push(message.clone());
                Ok(message)
            }
            Err(e) => {
                self.messages.pop();
                warn!(error = %e, "assistant reply failed, user message rolled back");
                Err(e)
            }
        }
    }
}

/// Assistant sessions by user id, bounded by least recent use.
pub struct ChatSessions {
    sessions: Mutex<LruCache<String, Arc<Mutex<AssistantSession>>>>,
}

impl Default for ChatSessions {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ChatSessions {
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(512) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The user's session, created on first use.
    pub async fn session(&self, user_id: &str) -> Arc<Mutex<AssistantSession>> {
        self.sessions
            .lock()
            .await
            .get_or_insert(user_id.to_string(), || {
                Arc::new(Mutex::new(AssistantSession::new()))
            })
            .clone()
    }

    pub async fn remove(&self, user_id: &str) -> bool {
        let removed = self.sessions.lock().await.pop(user_id).is_some();
        if removed {
            debug!(user_id, "assistant session dropped");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
