//! SQLite message repository implementation.

use chrono::{DateTime, Utc};
use palaver_core::message::repository::MessageRepository;
use palaver_types::chat::{Message, Sender};
use palaver_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    chat_id: String,
    text: String,
    sender: String,
    sender_id: String,
    incoming: bool,
    timestamp: String,
    is_edited: bool,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            text: row.try_get("text")?,
            sender: row.try_get("sender")?,
            sender_id: row.try_get("sender_id")?,
            incoming: row.try_get("incoming")?,
            timestamp: row.try_get("timestamp")?,
            is_edited: row.try_get("is_edited")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let chat_id = Uuid::parse_str(&self.chat_id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat_id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let timestamp = parse_datetime(&self.timestamp)?;

        Ok(Message {
            id,
            chat_id,
            text: self.text,
            sender,
            sender_id: self.sender_id,
            incoming: self.incoming,
            timestamp,
            is_edited: self.is_edited,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert_message(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages (id, chat_id, text, sender, sender_id, incoming, timestamp, is_edited)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.chat_id.to_string())
        .bind(&message.text)
        .bind(message.sender.to_string())
        .bind(&message.sender_id)
        .bind(message.incoming)
        .bind(message.timestamp.to_rfc3339())
        .bind(message.is_edited)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn insert_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        for message in messages {
            self.insert_message(message).await?;
        }
        Ok(())
    }

    async fn list_for_chat(&self, chat_id: &Uuid) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn find(&self, message_id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(message_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let msg_row = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(msg_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn update_text(
        &self,
        message_id: &Uuid,
        text: &str,
    ) -> Result<Option<Message>, RepositoryError> {
        let result = sqlx::query("UPDATE messages SET text = ?, is_edited = 1 WHERE id = ?")
            .bind(text)
            .bind(message_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find(message_id).await
    }

    async fn delete_for_chat(&self, chat_id: &Uuid) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_message(chat_id: Uuid, text: &str, at: DateTime<Utc>) -> Message {
        Message {
            id: Uuid::now_v7(),
            chat_id,
            text: text.to_string(),
            sender: Sender::User,
            sender_id: "guest-1".to_string(),
            incoming: false,
            timestamp: at,
            is_edited: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_ordered_by_timestamp() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let chat_id = Uuid::now_v7();
        let base = Utc::now();
        let second = make_message(chat_id, "second", base + chrono::Duration::milliseconds(100));
        let first = make_message(chat_id, "first", base);
        repo.insert_messages(&[second.clone(), first.clone()])
            .await
            .unwrap();

        // Message for another chat must not appear
        repo.insert_message(&make_message(Uuid::now_v7(), "other", base))
            .await
            .unwrap();

        let listed = repo.list_for_chat(&chat_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "first");
        assert_eq!(listed[1].text, "second");
    }

    #[tokio::test]
    async fn test_find_roundtrips_sender_and_flags() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let chat_id = Uuid::now_v7();
        let mut message = make_message(chat_id, "hello", Utc::now());
        message.sender = Sender::AutoResponse;
        message.sender_id = chat_id.to_string();
        message.incoming = true;
        repo.insert_message(&message).await.unwrap();

        let found = repo.find(&message.id).await.unwrap().unwrap();
        assert_eq!(found.sender, Sender::AutoResponse);
        assert_eq!(found.sender_id, chat_id.to_string());
        assert!(found.incoming);
        assert!(!found.is_edited);
    }

    #[tokio::test]
    async fn test_update_text_sets_is_edited() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let message = make_message(Uuid::now_v7(), "draft", Utc::now());
        repo.insert_message(&message).await.unwrap();

        let updated = repo
            .update_text(&message.id, "final")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "final");
        assert!(updated.is_edited);

        let missing = repo.update_text(&Uuid::now_v7(), "x").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_for_chat_returns_count() {
        let pool = test_pool().await;
        let repo = SqliteMessageRepository::new(pool);

        let chat_id = Uuid::now_v7();
        let base = Utc::now();
        repo.insert_messages(&[
            make_message(chat_id, "a", base),
            make_message(chat_id, "b", base),
        ])
        .await
        .unwrap();
        repo.insert_message(&make_message(Uuid::now_v7(), "keep", base))
            .await
            .unwrap();

        let deleted = repo.delete_for_chat(&chat_id).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(repo.list_for_chat(&chat_id).await.unwrap().is_empty());
    }
}
