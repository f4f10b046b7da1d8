//! Realtime events broadcast to WebSocket subscribers.
//!
//! Every event is scoped to a room keyed by chat id; connections join rooms
//! explicitly and only receive events for rooms they have joined.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{Chat, Message};

/// A room-scoped realtime event.
///
/// Serialized as a tagged JSON object, e.g.
/// `{"event":"new_message","chat_id":"...","message":{...},"chat":{...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A bot reply was persisted; carries the parent chat snapshot so
    /// listening clients can refresh previews without a round trip.
    NewMessage {
        chat_id: Uuid,
        message: Message,
        chat: Chat,
    },
    /// An existing message was edited.
    MessageUpdated { chat_id: Uuid, message: Message },
    /// Signal-only: chat previews for this room changed.
    ChatListUpdated { chat_id: Uuid },
}

impl ChatEvent {
    /// The room this event is scoped to.
    pub fn room(&self) -> Uuid {
        match self {
            ChatEvent::NewMessage { chat_id, .. }
            | ChatEvent::MessageUpdated { chat_id, .. }
            | ChatEvent::ChatListUpdated { chat_id } => *chat_id,
        }
    }

    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::NewMessage { .. } => "new_message",
            ChatEvent::MessageUpdated { .. } => "message_updated",
            ChatEvent::ChatListUpdated { .. } => "chat_list_updated",
        }
    }
}
