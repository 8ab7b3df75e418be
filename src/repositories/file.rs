//! PgFileStore - Store Postgres per i file caricati

use super::FileStore;
use crate::dtos::CreateFileDTO;
use crate::entities::{FileStatus, FileUpload};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Error, PgPool};
use uuid::Uuid;

pub struct PgFileStore {
    connection_pool: PgPool,
}

impl PgFileStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn list_all(&self) -> Result<Vec<FileUpload>, Error> {
        sqlx::query_as::<_, FileUpload>("SELECT * FROM files ORDER BY created_at DESC")
            .fetch_all(&self.connection_pool)
            .await
    }

    async fn list_by_owner(&self, dealer_id: &Uuid) -> Result<Vec<FileUpload>, Error> {
        sqlx::query_as::<_, FileUpload>(
            "SELECT * FROM files WHERE dealer_id = $1 ORDER BY created_at DESC",
        )
        .bind(dealer_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    async fn list_approved(&self) -> Result<Vec<FileUpload>, Error> {
        sqlx::query_as::<_, FileUpload>(
            "SELECT * FROM files WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(FileStatus::Approved)
        .fetch_all(&self.connection_pool)
        .await
    }

    async fn read(&self, id: &Uuid) -> Result<Option<FileUpload>, Error> {
        sqlx::query_as::<_, FileUpload>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    async fn create(&self, data: &CreateFileDTO) -> Result<FileUpload, Error> {
        sqlx::query_as::<_, FileUpload>(
            r#"
            INSERT INTO files (id, dealer_id, filename, folder, status, url, created_at)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.dealer_id)
        .bind(&data.filename)
        .bind(&data.folder)
        .bind(&data.url)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }

    async fn update_status(&self, id: &Uuid, status: FileStatus) -> Result<FileUpload, Error> {
        sqlx::query_as::<_, FileUpload>(
            "UPDATE files SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.connection_pool)
        .await
    }
}
