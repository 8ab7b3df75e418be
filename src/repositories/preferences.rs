//! PgPreferenceStore - Store Postgres per le preferenze

use super::PreferenceStore;
use crate::dtos::UpdatePreferencesDTO;
use crate::entities::UserPreferences;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgPreferenceStore {
    connection_pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn find_by_dealer(&self, dealer_id: &Uuid) -> Result<Option<UserPreferences>, Error> {
        sqlx::query_as::<_, UserPreferences>(
            "SELECT * FROM user_preferences WHERE dealer_id = $1",
        )
        .bind(dealer_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    async fn create_default(&self, dealer_id: &Uuid) -> Result<UserPreferences, Error> {
        let defaults = UserPreferences::defaults(*dealer_id, Utc::now());

        // A concurrent insert just means the defaults already exist;
        // read back whatever won.
        sqlx::query(
            r#"
            INSERT INTO user_preferences
                (id, dealer_id, language, theme, notifications_enabled,
                 email_notifications, chat_notifications, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (dealer_id) DO NOTHING
            "#,
        )
        .bind(defaults.id)
        .bind(defaults.dealer_id)
        .bind(&defaults.language)
        .bind(&defaults.theme)
        .bind(defaults.notifications_enabled)
        .bind(defaults.email_notifications)
        .bind(defaults.chat_notifications)
        .bind(defaults.created_at)
        .execute(&self.connection_pool)
        .await?;

        self.find_by_dealer(dealer_id)
            .await?
            .ok_or(Error::RowNotFound)
    }

    async fn update(
        &self,
        dealer_id: &Uuid,
        data: &UpdatePreferencesDTO,
    ) -> Result<UserPreferences, Error> {
        sqlx::query_as::<_, UserPreferences>(
            r#"
            UPDATE user_preferences SET
                language = COALESCE($2, language),
                theme = COALESCE($3, theme),
                notifications_enabled = COALESCE($4, notifications_enabled),
                email_notifications = COALESCE($5, email_notifications),
                chat_notifications = COALESCE($6, chat_notifications),
                updated_at = NOW()
            WHERE dealer_id = $1
            RETURNING *
            "#,
        )
        .bind(dealer_id)
        .bind(&data.language)
        .bind(&data.theme)
        .bind(data.notifications_enabled)
        .bind(data.email_notifications)
        .bind(data.chat_notifications)
        .fetch_one(&self.connection_pool)
        .await
    }
}
