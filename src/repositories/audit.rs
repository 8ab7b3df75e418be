//! PgAuditStore - Traccia di audit su Postgres

use super::AuditStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgAuditStore {
    connection_pool: PgPool,
}

impl PgAuditStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn record(
        &self,
        dealer_id: &Uuid,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, dealer_id, action, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dealer_id)
        .bind(action)
        .bind(details)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }
}
