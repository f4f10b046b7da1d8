//! Chat service: owner-scoped CRUD plus first-login initialization.
//!
//! Generic over `ChatRepository`, `MessageRepository`, and `AvatarFetcher` to
//! maintain clean architecture (palaver-core never depends on palaver-infra).

use chrono::Utc;
use palaver_types::chat::{Chat, ChatPreview};
use palaver_types::error::ChatError;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::chat::seed;
use crate::message::repository::MessageRepository;
use crate::remote::AvatarFetcher;

/// Validate a required name field, returning its trimmed form.
fn require_name(value: &str) -> Result<String, ChatError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation(
            "First name and last name are required.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Owner-scoped chat CRUD with lazy first-login seeding.
pub struct ChatService<C: ChatRepository, M: MessageRepository, A: AvatarFetcher> {
    chats: C,
    messages: M,
    avatars: A,
}

impl<C: ChatRepository, M: MessageRepository, A: AvatarFetcher> ChatService<C, M, A> {
    pub fn new(chats: C, messages: M, avatars: A) -> Self {
        Self {
            chats,
            messages,
            avatars,
        }
    }

    /// List the owner's chats, newest first, each with its last message.
    ///
    /// A present-but-empty search string filters nothing but still counts as
    /// a search, so it never triggers seeding. The first unfiltered call that
    /// finds no chats clones the template catalog for this owner and re-reads.
    pub async fn list_chats(
        &self,
        owner_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<ChatPreview>, ChatError> {
        let filter = search.map(str::trim).filter(|s| !s.is_empty());
        let chats = self.chats.list_for_owner(owner_id, filter).await?;

        if !chats.is_empty() || search.is_some() {
            return Ok(chats);
        }

        self.seed_for_owner(owner_id).await?;
        Ok(self.chats.list_for_owner(owner_id, None).await?)
    }

    /// Get one chat, owner-gated. A foreign chat reads as missing.
    pub async fn get_chat(&self, owner_id: &str, chat_id: &Uuid) -> Result<Chat, ChatError> {
        self.chats
            .find_owned(owner_id, chat_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// Create a chat with a freshly fetched avatar.
    ///
    /// The avatar fetch is best-effort; the fetcher degrades to a placeholder
    /// on its own, so creation never fails because of it.
    pub async fn create_chat(
        &self,
        owner_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Chat, ChatError> {
        let first_name = require_name(first_name)?;
        let last_name = require_name(last_name)?;

        let avatar_url = self.avatars.fetch_avatar().await;
        let chat = Chat {
            id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            first_name,
            last_name,
            avatar_url,
            last_message_id: None,
            created_at: Utc::now(),
            is_template: false,
        };

        self.chats.insert_chat(&chat).await?;
        info!(chat_id = %chat.id, "Chat created");
        Ok(chat)
    }

    /// Rename a chat via an atomic owner-filtered update.
    pub async fn rename_chat(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Chat, ChatError> {
        let first_name = require_name(first_name)?;
        let last_name = require_name(last_name)?;

        self.chats
            .update_names(owner_id, chat_id, &first_name, &last_name)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// Delete a chat, then its messages.
    ///
    /// The two statements are deliberately not wrapped in a transaction; a
    /// crash in between leaves orphaned messages.
    pub async fn delete_chat(&self, owner_id: &str, chat_id: &Uuid) -> Result<(), ChatError> {
        if !self.chats.delete_owned(owner_id, chat_id).await? {
            return Err(ChatError::NotFound);
        }

        let removed = self.messages.delete_for_chat(chat_id).await?;
        info!(chat_id = %chat_id, removed, "Chat and messages deleted");
        Ok(())
    }

    /// First-login initialization: ensure the template catalog, clone it for
    /// this owner, generate the paired seed conversations, and link each
    /// clone's last message in one batched update.
    async fn seed_for_owner(&self, owner_id: &str) -> Result<(), ChatError> {
        let mut templates = self.chats.list_templates().await?;
        if templates.is_empty() {
            templates = seed::template_chats(Utc::now());
            self.chats.insert_chats(&templates).await?;
            debug!(count = templates.len(), "Template catalog created");
        }

        let now = Utc::now();
        let clones: Vec<Chat> = templates
            .iter()
            .map(|tpl| seed::clone_for_owner(tpl, owner_id, now))
            .collect();
        self.chats.insert_chats(&clones).await?;

        let messages = seed::seed_messages(&clones, owner_id, now);
        self.messages.insert_messages(&messages).await?;

        let links: Vec<(Uuid, Option<Uuid>)> = clones
            .iter()
            .map(|chat| {
                let last = messages
                    .iter()
                    .filter(|m| m.chat_id == chat.id)
                    .max_by_key(|m| m.timestamp)
                    .map(|m| m.id);
                (chat.id, last)
            })
            .collect();
        self.chats.link_last_messages(&links).await?;

        info!(owner = %owner_id, chats = clones.len(), messages = messages.len(), "First-login chats seeded");
        Ok(())
    }
}
