//! PgDealerStore - Store Postgres per i dealer

use super::DealerStore;
use crate::dtos::{CreateDealerDTO, DealerStatsDTO, UpdateDealerDTO};
use crate::entities::{Dealer, DealerStatus};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgDealerStore {
    connection_pool: PgPool,
}

impl PgDealerStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl DealerStore for PgDealerStore {
    async fn list(&self, include_inactive: bool) -> Result<Vec<Dealer>, Error> {
        let query = if include_inactive {
            "SELECT * FROM dealers ORDER BY registration_date DESC"
        } else {
            "SELECT * FROM dealers WHERE is_active = TRUE ORDER BY registration_date DESC"
        };

        sqlx::query_as::<_, Dealer>(query)
            .fetch_all(&self.connection_pool)
            .await
    }

    async fn read(&self, id: &Uuid) -> Result<Option<Dealer>, Error> {
        sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Dealer>, Error> {
        sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.connection_pool)
            .await
    }

    async fn search(&self, term: &str) -> Result<Vec<Dealer>, Error> {
        let pattern = format!("%{}%", term);
        sqlx::query_as::<_, Dealer>(
            r#"
            SELECT * FROM dealers
            WHERE is_active = TRUE
              AND (name ILIKE $1 OR email ILIKE $1 OR company ILIKE $1)
            ORDER BY name ASC
            LIMIT 20
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    async fn create(&self, data: &CreateDealerDTO) -> Result<Dealer, Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers
                (id, name, email, phone, company, role, status, is_active,
                 profile_picture, notes, password_hash, created_at, registration_date)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', TRUE, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.company)
        .bind(data.role)
        .bind(&data.profile_picture)
        .bind(&data.notes)
        .bind(&data.password)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn update(&self, id: &Uuid, data: &UpdateDealerDTO) -> Result<Dealer, Error> {
        // COALESCE keeps the stored value wherever the DTO carries None
        sqlx::query_as::<_, Dealer>(
            r#"
            UPDATE dealers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                role = COALESCE($6, role),
                profile_picture = COALESCE($7, profile_picture),
                notes = COALESCE($8, notes),
                status = COALESCE($9, status),
                is_active = COALESCE($10, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.company)
        .bind(data.role)
        .bind(&data.profile_picture)
        .bind(&data.notes)
        .bind(data.status)
        .bind(data.is_active)
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn delete(&self, id: &Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM dealers WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    async fn online_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Dealer>, Error> {
        sqlx::query_as::<_, Dealer>(
            r#"
            SELECT * FROM dealers
            WHERE status = $1 AND last_login > $2
            ORDER BY last_login DESC
            "#,
        )
        .bind(DealerStatus::Active)
        .bind(cutoff)
        .fetch_all(&self.connection_pool)
        .await
    }

    async fn touch_last_login(&self, id: &Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE dealers SET last_login = NOW(), last_activity = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<DealerStatsDTO, Error> {
        let one_week_ago = now - Duration::days(7);
        let online_cutoff = now - Duration::seconds(crate::entities::ONLINE_WINDOW_SECS);

        let (total, active, inactive, new_this_week, online_now) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE is_active),
                    COUNT(*) FILTER (WHERE NOT is_active),
                    COUNT(*) FILTER (WHERE registration_date >= $1),
                    COUNT(*) FILTER (WHERE last_login > $2)
                FROM dealers
                "#,
            )
            .bind(one_week_ago)
            .bind(online_cutoff)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(DealerStatsDTO {
            total,
            active,
            inactive,
            new_this_week,
            online_now,
        })
    }
}
