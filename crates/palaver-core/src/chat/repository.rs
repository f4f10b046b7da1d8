//! ChatRepository trait definition.
//!
//! Owner scoping happens at the query level: every lookup that takes an
//! `owner_id` must return nothing for chats owned by anyone else, so a
//! foreign chat is indistinguishable from a missing one.
//! Implementations live in palaver-infra (`SqliteChatRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use palaver_types::chat::{Chat, ChatPreview};
use palaver_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat persistence.
pub trait ChatRepository: Send + Sync {
    /// Insert a single chat.
    fn insert_chat(
        &self,
        chat: &Chat,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bulk-insert chats (template catalog, first-login clones).
    fn insert_chats(
        &self,
        chats: &[Chat],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List non-template chats for an owner, newest first, each with its
    /// last message resolved. `search` filters by case-insensitive substring
    /// match on first or last name.
    fn list_for_owner(
        &self,
        owner_id: &str,
        search: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatPreview>, RepositoryError>> + Send;

    /// Find a chat by id, only if it belongs to `owner_id`.
    fn find_owned(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List template chats in insertion order.
    fn list_templates(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// Atomic find-and-update of the name fields, filtered by id and owner.
    /// Returns the updated chat, or None when no owned chat matched.
    fn update_names(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Atomic find-and-delete filtered by id and owner. Returns whether a
    /// row was deleted. Does not touch messages.
    fn delete_owned(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Point a chat's last-message reference at the given message.
    fn set_last_message(
        &self,
        chat_id: &Uuid,
        message_id: Option<&Uuid>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Batched last-message linkage for freshly seeded chats.
    fn link_last_messages(
        &self,
        links: &[(Uuid, Option<Uuid>)],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
