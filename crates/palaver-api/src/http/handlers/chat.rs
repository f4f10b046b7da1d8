//! Chat CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use palaver_types::chat::{Chat, ChatPreview};

use crate::http::error::AppError;
use crate::http::extractors::Owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListChatsParams {
    /// Case-insensitive substring filter on first or last name.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatNamesRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// GET /api/chats - List the owner's chats, newest first.
///
/// The first unfiltered call for a new owner seeds the starter chats.
pub async fn list_chats(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Query(params): Query<ListChatsParams>,
) -> Result<Json<Vec<ChatPreview>>, AppError> {
    let chats = state
        .chat_service
        .list_chats(&owner_id, params.q.as_deref())
        .await?;
    Ok(Json(chats))
}

/// POST /api/chats - Create a chat with a freshly fetched avatar.
pub async fn create_chat(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Json(body): Json<ChatNamesRequest>,
) -> Result<(StatusCode, Json<Chat>), AppError> {
    let chat = state
        .chat_service
        .create_chat(&owner_id, &body.first_name, &body.last_name)
        .await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET /api/chats/{id} - Fetch one owned chat.
pub async fn get_chat(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Chat>, AppError> {
    let chat = state.chat_service.get_chat(&owner_id, &chat_id).await?;
    Ok(Json(chat))
}

/// PUT /api/chats/{id} - Rename an owned chat.
pub async fn update_chat(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<ChatNamesRequest>,
) -> Result<Json<Chat>, AppError> {
    let chat = state
        .chat_service
        .rename_chat(&owner_id, &chat_id, &body.first_name, &body.last_name)
        .await?;
    Ok(Json(chat))
}

/// DELETE /api/chats/{id} - Delete an owned chat and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    Owner(owner_id): Owner,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.chat_service.delete_chat(&owner_id, &chat_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true, "id": chat_id })))
}
