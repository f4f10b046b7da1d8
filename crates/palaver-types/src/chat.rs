//! Chat and message types.
//!
//! A `Chat` is a thread scoped to an opaque owner id (guest token or user id).
//! Template chats carry the sentinel owner `"base"` and are cloned per owner
//! on first login; they are never returned by owner-scoped queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Sentinel owner id attributed to template chats.
pub const TEMPLATE_OWNER: &str = "base";

/// Who produced a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'auto_response'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    AutoResponse,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::AutoResponse => write!(f, "auto_response"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "auto_response" => Ok(Sender::AutoResponse),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A chat thread owned by a guest or an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    /// Opaque owner id; `"base"` for template rows.
    pub owner_id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
    /// Most recent message in this chat, if any.
    pub last_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub is_template: bool,
}

impl Chat {
    /// Full display name, `"First Last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A single message within a chat.
///
/// Invariants: `sender = User` implies `incoming = false` and
/// `sender_id = owner id`; `sender = AutoResponse` implies `incoming = true`
/// and `sender_id = chat id` as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub sender_id: String,
    pub incoming: bool,
    /// Creation time, used for ordering within a chat.
    pub timestamp: DateTime<Utc>,
    pub is_edited: bool,
}

/// A chat with its last message resolved, as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPreview {
    #[serde(flatten)]
    pub chat: Chat,
    pub last_message: Option<Message>,
}
