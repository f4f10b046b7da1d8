//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `palaver-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations.

use chrono::{DateTime, Utc};
use palaver_core::chat::repository::ChatRepository;
use palaver_types::chat::{Chat, ChatPreview, Message, Sender};
use palaver_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Chat.
struct ChatRow {
    id: String,
    owner_id: String,
    first_name: String,
    last_name: String,
    avatar_url: String,
    last_message_id: Option<String>,
    created_at: String,
    is_template: bool,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            avatar_url: row.try_get("avatar_url")?,
            last_message_id: row.try_get("last_message_id")?,
            created_at: row.try_get("created_at")?,
            is_template: row.try_get("is_template")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat id: {e}")))?;
        let last_message_id = self
            .last_message_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid last_message_id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Chat {
            id,
            owner_id: self.owner_id,
            first_name: self.first_name,
            last_name: self.last_name,
            avatar_url: self.avatar_url,
            last_message_id,
            created_at,
            is_template: self.is_template,
        })
    }
}

/// Maps a joined row (chat columns plus `m_`-prefixed message columns) to a
/// `ChatPreview`. A NULL `m_id` means the chat has no last message.
fn preview_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatPreview, RepositoryError> {
    let chat = ChatRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_chat()?;

    let m_id: Option<String> = row
        .try_get("m_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let last_message = match m_id {
        Some(m_id) => {
            let id = Uuid::parse_str(&m_id)
                .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
            let chat_id_raw: String = row
                .try_get("m_chat_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let chat_id = Uuid::parse_str(&chat_id_raw)
                .map_err(|e| RepositoryError::Query(format!("invalid chat_id: {e}")))?;
            let text: String = row
                .try_get("m_text")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let sender_raw: String = row
                .try_get("m_sender")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let sender: Sender = sender_raw
                .parse()
                .map_err(|e: String| RepositoryError::Query(e))?;
            let sender_id: String = row
                .try_get("m_sender_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let incoming: bool = row
                .try_get("m_incoming")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let timestamp_raw: String = row
                .try_get("m_timestamp")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let timestamp = parse_datetime(&timestamp_raw)?;
            let is_edited: bool = row
                .try_get("m_is_edited")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

            Some(Message {
                id,
                chat_id,
                text,
                sender,
                sender_id,
                incoming,
                timestamp,
                is_edited,
            })
        }
        None => None,
    };

    Ok(ChatPreview { chat, last_message })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

const PREVIEW_SELECT: &str = r#"SELECT c.*,
       m.id AS m_id, m.chat_id AS m_chat_id, m.text AS m_text,
       m.sender AS m_sender, m.sender_id AS m_sender_id,
       m.incoming AS m_incoming, m.timestamp AS m_timestamp,
       m.is_edited AS m_is_edited
  FROM chats c
  LEFT JOIN messages m ON m.id = c.last_message_id"#;

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn insert_chat(&self, chat: &Chat) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chats (id, owner_id, first_name, last_name, avatar_url, last_message_id, created_at, is_template)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(chat.id.to_string())
        .bind(&chat.owner_id)
        .bind(&chat.first_name)
        .bind(&chat.last_name)
        .bind(&chat.avatar_url)
        .bind(chat.last_message_id.map(|id| id.to_string()))
        .bind(format_datetime(&chat.created_at))
        .bind(chat.is_template)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn insert_chats(&self, chats: &[Chat]) -> Result<(), RepositoryError> {
        for chat in chats {
            self.insert_chat(chat).await?;
        }
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<ChatPreview>, RepositoryError> {
        let mut sql = format!("{PREVIEW_SELECT} WHERE c.owner_id = ? AND c.is_template = 0");
        if search.is_some() {
            sql.push_str(
                " AND (instr(lower(c.first_name), lower(?)) > 0 OR instr(lower(c.last_name), lower(?)) > 0)",
            );
        }
        sql.push_str(" ORDER BY c.created_at DESC, c.id DESC");

        let mut query = sqlx::query(&sql).bind(owner_id);
        if let Some(needle) = search {
            query = query.bind(needle).bind(needle);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut previews = Vec::with_capacity(rows.len());
        for row in &rows {
            previews.push(preview_from_row(row)?);
        }

        Ok(previews)
    }

    async fn find_owned(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
    ) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ? AND owner_id = ?")
            .bind(chat_id.to_string())
            .bind(owner_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let chat_row =
                    ChatRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn list_templates(&self) -> Result<Vec<Chat>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chats WHERE is_template = 1 ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row =
                ChatRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }

    async fn update_names(
        &self,
        owner_id: &str,
        chat_id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Chat>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE chats SET first_name = ?, last_name = ? WHERE id = ? AND owner_id = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(chat_id.to_string())
        .bind(owner_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_owned(owner_id, chat_id).await
    }

    async fn delete_owned(&self, owner_id: &str, chat_id: &Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM chats WHERE id = ? AND owner_id = ?")
            .bind(chat_id.to_string())
            .bind(owner_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_last_message(
        &self,
        chat_id: &Uuid,
        message_id: Option<&Uuid>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chats SET last_message_id = ? WHERE id = ?")
            .bind(message_id.map(|id| id.to_string()))
            .bind(chat_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn link_last_messages(
        &self,
        links: &[(Uuid, Option<Uuid>)],
    ) -> Result<(), RepositoryError> {
        for (chat_id, message_id) in links {
            sqlx::query("UPDATE chats SET last_message_id = ? WHERE id = ?")
                .bind(message_id.map(|id| id.to_string()))
                .bind(chat_id.to_string())
                .execute(&self.pool.writer)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;
    use palaver_types::chat::TEMPLATE_OWNER;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_chat(owner_id: &str, first: &str, last: &str) -> Chat {
        Chat {
            id: Uuid::now_v7(),
            owner_id: owner_id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar_url: "https://example.com/a.png".to_string(),
            last_message_id: None,
            created_at: Utc::now(),
            is_template: false,
        }
    }

    fn make_message(chat_id: Uuid, text: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            chat_id,
            text: text.to_string(),
            sender: Sender::User,
            sender_id: "guest-1".to_string(),
            incoming: false,
            timestamp: Utc::now(),
            is_edited: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_owned() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("guest-1", "Alice", "Freeman");
        repo.insert_chat(&chat).await.unwrap();

        let found = repo.find_owned("guest-1", &chat.id).await.unwrap().unwrap();
        assert_eq!(found.id, chat.id);
        assert_eq!(found.first_name, "Alice");
        assert!(!found.is_template);

        // Owner scoping: another owner cannot see it
        let hidden = repo.find_owned("guest-2", &chat.id).await.unwrap();
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn test_list_for_owner_excludes_templates_and_orders_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut older = make_chat("guest-1", "Alice", "Freeman");
        older.created_at = Utc::now() - chrono::Duration::minutes(5);
        let newer = make_chat("guest-1", "Helen", "Fischer");
        let template = Chat {
            owner_id: TEMPLATE_OWNER.to_string(),
            is_template: true,
            ..make_chat(TEMPLATE_OWNER, "Piter", "Steele")
        };
        repo.insert_chats(&[older.clone(), newer.clone(), template])
            .await
            .unwrap();

        let listed = repo.list_for_owner("guest-1", None).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].chat.id, newer.id);
        assert_eq!(listed[1].chat.id, older.id);
    }

    #[tokio::test]
    async fn test_list_for_owner_search_is_case_insensitive_substring() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        repo.insert_chats(&[
            make_chat("guest-1", "Alice", "Freeman"),
            make_chat("guest-1", "Helen", "Fischer"),
        ])
        .await
        .unwrap();

        let hits = repo.list_for_owner("guest-1", Some("FREE")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chat.first_name, "Alice");

        // Empty search string filters nothing
        let all = repo.list_for_owner("guest-1", Some("")).await.unwrap();
        assert_eq!(all.len(), 2);

        let none = repo.list_for_owner("guest-1", Some("zzz")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_owner_embeds_last_message() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let chat = make_chat("guest-1", "Alice", "Freeman");
        repo.insert_chat(&chat).await.unwrap();

        let message = make_message(chat.id, "Will we meet?");
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
        .execute(&pool.writer)
        .await
        .unwrap();

        repo.set_last_message(&chat.id, Some(&message.id))
            .await
            .unwrap();

        let listed = repo.list_for_owner("guest-1", None).await.unwrap();
        assert_eq!(listed.len(), 1);
        let last = listed[0].last_message.as_ref().unwrap();
        assert_eq!(last.id, message.id);
        assert_eq!(last.text, "Will we meet?");
        assert_eq!(last.sender, Sender::User);
    }

    #[tokio::test]
    async fn test_list_templates_ordered_oldest_first() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let mut first = Chat {
            owner_id: TEMPLATE_OWNER.to_string(),
            is_template: true,
            ..make_chat(TEMPLATE_OWNER, "Alice", "Freeman")
        };
        first.created_at = Utc::now() - chrono::Duration::minutes(1);
        let second = Chat {
            owner_id: TEMPLATE_OWNER.to_string(),
            is_template: true,
            ..make_chat(TEMPLATE_OWNER, "Helen", "Fischer")
        };
        repo.insert_chats(&[second.clone(), first.clone()])
            .await
            .unwrap();

        let templates = repo.list_templates().await.unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].id, first.id);
        assert_eq!(templates[1].id, second.id);
    }

    #[tokio::test]
    async fn test_update_names_scoped_to_owner() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("guest-1", "Alice", "Freeman");
        repo.insert_chat(&chat).await.unwrap();

        let updated = repo
            .update_names("guest-1", &chat.id, "Alicia", "Freed")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Alicia");
        assert_eq!(updated.last_name, "Freed");

        let denied = repo
            .update_names("guest-2", &chat.id, "X", "Y")
            .await
            .unwrap();
        assert!(denied.is_none());
    }

    #[tokio::test]
    async fn test_delete_owned() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let chat = make_chat("guest-1", "Alice", "Freeman");
        repo.insert_chat(&chat).await.unwrap();

        assert!(!repo.delete_owned("guest-2", &chat.id).await.unwrap());
        assert!(repo.delete_owned("guest-1", &chat.id).await.unwrap());
        assert!(repo.find_owned("guest-1", &chat.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_last_message_missing_chat() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let err = repo
            .set_last_message(&Uuid::now_v7(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
