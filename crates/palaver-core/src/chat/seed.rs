//! First-login seed data: template personas and their fixed conversations.
//!
//! Each persona is paired 1:1 by array position with a seed conversation.
//! Seed messages get explicit synthetic timestamps stepped by a fixed 100 ms
//! across the entire batch (not reset per chat), which keeps the generated
//! set strictly ordered and avoids same-millisecond ties on bulk insert.

use chrono::{DateTime, Duration, Utc};
use palaver_types::chat::{Chat, Message, Sender, TEMPLATE_OWNER};
use uuid::Uuid;

/// Synthetic timestamp step between consecutive seed messages.
pub const SEED_STEP_MS: i64 = 100;

/// A template chat persona.
pub struct Persona {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub avatar_url: &'static str,
}

/// A single line of a seed conversation.
struct SeedLine {
    text: &'static str,
    sender: Sender,
    incoming: bool,
}

/// The fixed template catalog.
pub const PERSONAS: [Persona; 3] = [
    Persona {
        first_name: "Alice",
        last_name: "Freeman",
        avatar_url: "https://cdn-icons-png.flaticon.com/512/428/428573.png",
    },
    Persona {
        first_name: "Helen",
        last_name: "Fischer",
        avatar_url:
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTnSA1zygA3rubv-VK0DrVcQ02Po79kJhXo_A&s",
    },
    Persona {
        first_name: "Piter",
        last_name: "Steele",
        avatar_url: "https://cdn-icons-png.flaticon.com/512/219/219983.png",
    },
];

/// Seed conversations, paired with `PERSONAS` by index.
const CONVERSATIONS: [&[SeedLine]; 3] = [
    // Alice Freeman
    &[
        SeedLine {
            text: "Hello",
            sender: Sender::User,
            incoming: false,
        },
        SeedLine {
            text: "Hi",
            sender: Sender::AutoResponse,
            incoming: true,
        },
        SeedLine {
            text: "Will we meet?",
            sender: Sender::User,
            incoming: false,
        },
    ],
    // Helen Fischer
    &[
        SeedLine {
            text: "Доброго дня",
            sender: Sender::User,
            incoming: false,
        },
        SeedLine {
            text: "Доброго",
            sender: Sender::AutoResponse,
            incoming: true,
        },
        SeedLine {
            text: "Ми вас чекаємо на зустрічі о 11.00",
            sender: Sender::AutoResponse,
            incoming: true,
        },
    ],
    // Piter Steele
    &[
        SeedLine {
            text: "Доброго дня",
            sender: Sender::AutoResponse,
            incoming: true,
        },
        SeedLine {
            text: "Вас цікавить ковбаса?",
            sender: Sender::AutoResponse,
            incoming: true,
        },
    ],
];

/// Build the canonical template chat rows from the catalog.
pub fn template_chats(now: DateTime<Utc>) -> Vec<Chat> {
    PERSONAS
        .iter()
        .map(|p| Chat {
            id: Uuid::now_v7(),
            owner_id: TEMPLATE_OWNER.to_string(),
            first_name: p.first_name.to_string(),
            last_name: p.last_name.to_string(),
            avatar_url: p.avatar_url.to_string(),
            last_message_id: None,
            created_at: now,
            is_template: true,
        })
        .collect()
}

/// Clone a template into a chat owned by `owner_id`.
pub fn clone_for_owner(template: &Chat, owner_id: &str, now: DateTime<Utc>) -> Chat {
    Chat {
        id: Uuid::now_v7(),
        owner_id: owner_id.to_string(),
        first_name: template.first_name.clone(),
        last_name: template.last_name.clone(),
        avatar_url: template.avatar_url.clone(),
        last_message_id: None,
        created_at: now,
        is_template: false,
    }
}

/// Generate the seed messages for freshly cloned chats.
///
/// Chats are paired with conversations by position; an index past the end of
/// the conversation table yields no messages for that chat. Timestamps start
/// at `start + 100ms` and increase by 100 ms per message across the whole
/// batch. Incoming lines get `sender_id` = chat id, outgoing get the owner.
pub fn seed_messages(chats: &[Chat], owner_id: &str, start: DateTime<Utc>) -> Vec<Message> {
    let mut timestamp = start;
    let mut messages = Vec::new();

    for (index, chat) in chats.iter().enumerate() {
        let Some(lines) = CONVERSATIONS.get(index) else {
            continue;
        };
        for line in *lines {
            timestamp += Duration::milliseconds(SEED_STEP_MS);
            messages.push(Message {
                id: Uuid::now_v7(),
                chat_id: chat.id,
                text: line.text.to_string(),
                sender: line.sender,
                sender_id: if line.incoming {
                    chat.id.to_string()
                } else {
                    owner_id.to_string()
                },
                incoming: line.incoming,
                timestamp,
                is_edited: false,
            });
        }
    }

    messages
}
