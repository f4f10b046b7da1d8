//! Message handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use palaver_types::chat::Message;

use crate::http::error::AppError;
use crate::http::extractors::Owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageTextRequest {
    #[serde(default)]
    pub text: String,
}

/// GET /api/chats/{chat_id}/messages - All messages of an owned chat, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .message_service
        .list_messages(&owner_id, &chat_id)
        .await?;
    Ok(Json(messages))
}

/// POST /api/chats/{chat_id}/messages - Send a message.
///
/// Responds with the stored message immediately; the auto-response arrives
/// later over the WebSocket.
pub async fn send_message(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<MessageTextRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = state
        .message_service
        .send_message(&owner_id, &chat_id, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /api/messages/{id} - Edit an own user-sent message.
pub async fn edit_message(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(message_id): Path<Uuid>,
    Json(body): Json<MessageTextRequest>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .message_service
        .edit_message(&owner_id, &message_id, &body.text)
        .await?;
    Ok(Json(message))
}
