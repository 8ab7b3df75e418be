//! PgMessageStore - Store Postgres per i messaggi

use super::MessageStore;
use crate::dtos::CreateMessageDTO;
use crate::entities::Message;
use async_trait::async_trait;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgMessageStore {
    connection_pool: PgPool,
}

impl PgMessageStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn conversation(&self, a: &Uuid, b: &Uuid) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY sent_at ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.connection_pool)
        .await
    }

    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, body, sent_at, read)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.sender_id)
        .bind(data.receiver_id)
        .bind(&data.body)
        .bind(data.sent_at)
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn mark_read(&self, receiver_id: &Uuid, ids: &[Uuid]) -> Result<u64, Error> {
        let result = sqlx::query(
            "UPDATE messages SET read = TRUE WHERE receiver_id = $1 AND id = ANY($2)",
        )
        .bind(receiver_id)
        .bind(ids)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND read = FALSE
            "#,
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn unread_count(&self, receiver_id: &Uuid, sender_id: &Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE receiver_id = $1 AND sender_id = $2 AND read = FALSE
            "#,
        )
        .bind(receiver_id)
        .bind(sender_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn last_message(&self, a: &Uuid, b: &Uuid) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY sent_at DESC
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
