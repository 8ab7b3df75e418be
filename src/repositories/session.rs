//! PgSessionStore - Store Postgres per le sessioni

use super::SessionStore;
use crate::dtos::CreateSessionDTO;
use crate::entities::{ActiveSessionRow, UserSession};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgSessionStore {
    connection_pool: PgPool,
}

impl PgSessionStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn open(&self, data: &CreateSessionDTO) -> Result<UserSession, Error> {
        // Two independent statements, no transaction: losing the close on a
        // crash leaves a stale row the next login closes anyway.
        self.close_for_dealer(&data.dealer_id).await?;

        sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_sessions
                (id, dealer_id, session_start, ip_address, user_agent, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.dealer_id)
        .bind(Utc::now())
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn close_for_dealer(&self, dealer_id: &Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE user_sessions SET is_active = FALSE, session_end = NOW()
            WHERE dealer_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(dealer_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<ActiveSessionRow>, Error> {
        sqlx::query_as::<_, ActiveSessionRow>(
            r#"
            SELECT
                s.id, s.dealer_id, s.session_start, s.ip_address, s.user_agent,
                d.name AS dealer_name,
                d.email AS dealer_email,
                d.profile_picture AS dealer_profile_picture
            FROM user_sessions s
            JOIN dealers d ON d.id = s.dealer_id
            WHERE s.is_active = TRUE
            ORDER BY s.session_start DESC
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }
}
