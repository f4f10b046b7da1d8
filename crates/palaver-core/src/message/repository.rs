//! MessageRepository trait definition.
//!
//! Messages are scoped to their chat; ownership checks go through the chat,
//! never the message itself. Implementations live in palaver-infra.

use palaver_types::chat::Message;
use palaver_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for message persistence.
pub trait MessageRepository: Send + Sync {
    /// Insert a single message.
    fn insert_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bulk-insert messages, preserving their explicit timestamps.
    fn insert_messages(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages for a chat, ordered by timestamp ascending.
    fn list_for_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Find a message by id.
    fn find(
        &self,
        message_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Replace a message's text and mark it edited. Returns the updated
    /// message, or None when the id does not exist.
    fn update_text(
        &self,
        message_id: &Uuid,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Delete every message belonging to a chat. Returns the removed count.
    fn delete_for_chat(
        &self,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
