//! Message service: list, send, edit, and the delayed auto-response.
//!
//! Sending a user message returns synchronously; the bot reply runs on a
//! spawned task after a fixed delay, with no handle retained and no
//! cancellation. Each send schedules its own independent timer, so rapid
//! sends to the same chat can complete out of order and the last writer to
//! update the chat's last message wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use palaver_types::chat::{Chat, Message, Sender};
use palaver_types::error::MessageError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::event::bus::EventBus;
use crate::message::repository::MessageRepository;
use crate::remote::QuoteFetcher;
use palaver_types::event::ChatEvent;

/// Default delay before the simulated bot reply.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(3000);

fn require_text(text: &str) -> Result<String, MessageError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MessageError::Validation(
            "Message text cannot be empty.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Chat-scoped message operations plus auto-response orchestration.
pub struct MessageService<C, M, Q> {
    chats: C,
    messages: M,
    quotes: Q,
    events: EventBus,
    reply_delay: Duration,
}

impl<C, M, Q> MessageService<C, M, Q>
where
    C: ChatRepository + 'static,
    M: MessageRepository + 'static,
    Q: QuoteFetcher + 'static,
{
    pub fn new(chats: C, messages: M, quotes: Q, events: EventBus, reply_delay: Duration) -> Self {
        Self {
            chats,
            messages,
            quotes,
            events,
            reply_delay,
        }
    }

    /// All messages of an owned chat, oldest first.
    pub async fn list_messages(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
    ) -> Result<Vec<Message>, MessageError> {
        self.chats
            .find_owned(owner_id, chat_id)
            .await?
            .ok_or(MessageError::ChatNotFound)?;

        Ok(self.messages.list_for_chat(chat_id).await?)
    }

    /// Persist a user message, link it as the chat's last message, and
    /// schedule the bot reply. Returns the persisted message without
    /// waiting for the reply.
    pub async fn send_message(
        self: &Arc<Self>,
        owner_id: &str,
        chat_id: &Uuid,
        text: &str,
    ) -> Result<Message, MessageError> {
        let chat = self
            .chats
            .find_owned(owner_id, chat_id)
            .await?
            .ok_or(MessageError::ChatNotFound)?;
        let text = require_text(text)?;

        let message = Message {
            id: Uuid::now_v7(),
            chat_id: *chat_id,
            text,
            sender: Sender::User,
            sender_id: owner_id.to_string(),
            incoming: false,
            timestamp: Utc::now(),
            is_edited: false,
        };

        self.messages.insert_message(&message).await?;
        self.chats
            .set_last_message(chat_id, Some(&message.id))
            .await?;

        // Fire-and-forget: the HTTP response must not wait on the bot.
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.auto_reply(chat).await;
        });

        Ok(message)
    }

    /// Edit an own user-sent message and broadcast the update.
    ///
    /// Ownership and sender kind are checked together; the caller cannot
    /// tell which of the two failed.
    pub async fn edit_message(
        &self,
        owner_id: &str,
        message_id: &Uuid,
        text: &str,
    ) -> Result<Message, MessageError> {
        let text = require_text(text)?;

        let message = self
            .messages
            .find(message_id)
            .await?
            .ok_or(MessageError::NotFound)?;

        if message.sender_id != owner_id || message.sender != Sender::User {
            return Err(MessageError::Forbidden);
        }

        let updated = self
            .messages
            .update_text(message_id, &text)
            .await?
            .ok_or(MessageError::NotFound)?;

        self.events.publish(ChatEvent::MessageUpdated {
            chat_id: updated.chat_id,
            message: updated.clone(),
        });

        Ok(updated)
    }

    /// The deferred half of a send: wait out the configured delay, fetch a
    /// quote (the fetcher degrades to a fallback string on its own), persist
    /// the bot message, relink the chat's last message, and publish events.
    ///
    /// Everything here runs after the originating request has completed, so
    /// failures are logged and swallowed.
    async fn auto_reply(&self, chat: Chat) {
        tokio::time::sleep(self.reply_delay).await;

        let quote = self.quotes.fetch_quote().await;
        let reply = Message {
            id: Uuid::now_v7(),
            chat_id: chat.id,
            text: quote,
            sender: Sender::AutoResponse,
            sender_id: chat.id.to_string(),
            incoming: true,
            timestamp: Utc::now(),
            is_edited: false,
        };

        if let Err(err) = self.messages.insert_message(&reply).await {
            warn!(chat_id = %chat.id, error = %err, "Auto-response persist failed");
            return;
        }

        if let Err(err) = self.chats.set_last_message(&chat.id, Some(&reply.id)).await {
            // The chat may have been deleted while the timer was pending.
            debug!(chat_id = %chat.id, error = %err, "Auto-response last-message update missed");
        }

        let chat_id = chat.id;
        self.events.publish(ChatEvent::NewMessage {
            chat_id,
            message: reply,
            chat,
        });
        // Separate signal so listening clients refresh chat previews.
        self.events.publish(ChatEvent::ChatListUpdated { chat_id });
    }
}
