use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use fitgenius_core::models::chat::ChatMessage;
use fitgenius_core::models::user::CurrentUser;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub reply: ChatMessage,
    pub messages: Vec<ChatMessage>,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Json<Vec<ChatMessage>> {
    let session = state.chats.session(&user.id).await;
    let messages = session.lock().await.messages().to_vec();
    Json(messages)
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let session = state.chats.session(&user.id).await;
    let mut session = session.lock().await;

    let reply = session.send(&state.generator, &body.query).await?;

    Ok(Json(SendMessageResponse {
        reply,
        messages: session.messages().to_vec(),
    }))
}
