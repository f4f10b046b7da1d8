//! In-memory fakes for the repository and collaborator traits.
//!
//! Core service tests cannot use the SQLite repositories (that would invert
//! the crate dependency), so `MemStore` implements all three repository
//! traits over mutex-guarded vectors with the same query semantics.

use std::sync::{Arc, Mutex};

use palaver_types::chat::{Chat, ChatPreview, Message};
use palaver_types::error::{AuthError, RepositoryError};
use palaver_types::identity::{User, UserProfile};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::identity::repository::UserRepository;
use crate::message::repository::MessageRepository;
use crate::remote::{AvatarFetcher, QuoteFetcher, UserInfoFetcher};

#[derive(Default)]
struct MemInner {
    chats: Mutex<Vec<Chat>>,
    messages: Mutex<Vec<Message>>,
    users: Mutex<Vec<User>>,
}

/// Shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<MemInner>,
}

impl MemStore {
    pub fn push_chat(&self, chat: Chat) {
        self.inner.chats.lock().unwrap().push(chat);
    }

    pub fn chat(&self, chat_id: &Uuid) -> Option<Chat> {
        self.inner
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *chat_id)
            .cloned()
    }

    pub fn all_messages(&self) -> Vec<Message> {
        let mut messages = self.inner.messages.lock().unwrap().clone();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }
}

impl ChatRepository for MemStore {
    async fn insert_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        self.inner.chats.lock().unwrap().push(chat.clone());
        Ok(())
    }

    async fn insert_chats(&self, chats: &[Chat]) -> Result<(), RepositoryError> {
        self.inner.chats.lock().unwrap().extend_from_slice(chats);
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<ChatPreview>, RepositoryError> {
        let needle = search.map(str::to_lowercase);
        let mut chats: Vec<Chat> = self
            .inner
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id && !c.is_template)
            .filter(|c| match &needle {
                Some(q) => {
                    c.first_name.to_lowercase().contains(q)
                        || c.last_name.to_lowercase().contains(q)
                }
                None => true,
            })
            .cloned()
            .collect();
        chats.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        let messages = self.inner.messages.lock().unwrap();
        Ok(chats
            .into_iter()
            .map(|chat| {
                let last_message = chat
                    .last_message_id
                    .and_then(|id| messages.iter().find(|m| m.id == id).cloned());
                ChatPreview { chat, last_message }
            })
            .collect())
    }

    async fn find_owned(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
    ) -> Result<Option<Chat>, RepositoryError> {
        Ok(self
            .inner
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *chat_id && c.owner_id == owner_id)
            .cloned())
    }

    async fn list_templates(&self) -> Result<Vec<Chat>, RepositoryError> {
        Ok(self
            .inner
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_template)
            .cloned()
            .collect())
    }

    async fn update_names(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Chat>, RepositoryError> {
        let mut chats = self.inner.chats.lock().unwrap();
        match chats
            .iter_mut()
            .find(|c| c.id == *chat_id && c.owner_id == owner_id)
        {
            Some(chat) => {
                chat.first_name = first_name.to_string();
                chat.last_name = last_name.to_string();
                Ok(Some(chat.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_owned(&self, owner_id: &str, chat_id: &Uuid) -> Result<bool, RepositoryError> {
        let mut chats = self.inner.chats.lock().unwrap();
        let before = chats.len();
        chats.retain(|c| !(c.id == *chat_id && c.owner_id == owner_id));
        Ok(chats.len() < before)
    }

    async fn set_last_message(
        &self,
        chat_id: &Uuid,
        message_id: Option<&Uuid>,
    ) -> Result<(), RepositoryError> {
        let mut chats = self.inner.chats.lock().unwrap();
        match chats.iter_mut().find(|c| c.id == *chat_id) {
            Some(chat) => {
                chat.last_message_id = message_id.copied();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn link_last_messages(
        &self,
        links: &[(Uuid, Option<Uuid>)],
    ) -> Result<(), RepositoryError> {
        let mut chats = self.inner.chats.lock().unwrap();
        for (chat_id, message_id) in links {
            if let Some(chat) = chats.iter_mut().find(|c| c.id == *chat_id) {
                chat.last_message_id = *message_id;
            }
        }
        Ok(())
    }
}

impl MessageRepository for MemStore {
    async fn insert_message(&self, message: &Message) -> Result<(), RepositoryError> {
        self.inner.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn insert_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        self.inner
            .messages
            .lock()
            .unwrap()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn list_for_chat(&self, chat_id: &Uuid) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .inner
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == *chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn find(&self, message_id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        Ok(self
            .inner
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == *message_id)
            .cloned())
    }

    async fn update_text(
        &self,
        message_id: &Uuid,
        text: &str,
    ) -> Result<Option<Message>, RepositoryError> {
        let mut messages = self.inner.messages.lock().unwrap();
        match messages.iter_mut().find(|m| m.id == *message_id) {
            Some(message) => {
                message.text = text.to_string();
                message.is_edited = true;
                Ok(Some(message.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_for_chat(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let mut messages = self.inner.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.chat_id != *chat_id);
        Ok((before - messages.len()) as u64)
    }
}

impl UserRepository for MemStore {
    async fn find_by_provider(
        &self,
        provider_name: &str,
        provider_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.provider_name == provider_name && u.provider_id == provider_id)
            .cloned())
    }

    async fn find_by_id(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .inner
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == *user_id)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.inner.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.inner.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Avatar fetcher returning a fixed URL.
pub struct FixedAvatar(pub &'static str);

impl AvatarFetcher for FixedAvatar {
    async fn fetch_avatar(&self) -> String {
        self.0.to_string()
    }
}

/// Quote fetcher returning a fixed string.
pub struct FixedQuote(pub &'static str);

impl QuoteFetcher for FixedQuote {
    async fn fetch_quote(&self) -> String {
        self.0.to_string()
    }
}

/// Userinfo fetcher that either accepts every token with a fixed profile or
/// rejects everything.
pub struct StaticProfiles {
    profile: Option<UserProfile>,
}

impl StaticProfiles {
    pub fn accepting(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    pub fn rejecting() -> Self {
        Self { profile: None }
    }
}

impl UserInfoFetcher for StaticProfiles {
    async fn fetch_profile(&self, _access_token: &str) -> Result<UserProfile, AuthError> {
        self.profile.clone().ok_or(AuthError::ProviderRejected)
    }
}
