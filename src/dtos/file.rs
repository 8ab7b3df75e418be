//! File DTOs - Data Transfer Objects per i file caricati

use crate::entities::{FileStatus, FileUpload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileUploadDTO {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub filename: String,
    pub folder: String,
    pub status: FileStatus,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<FileUpload> for FileUploadDTO {
    fn from(value: FileUpload) -> Self {
        Self {
            id: value.id,
            dealer_id: value.dealer_id,
            filename: value.filename,
            folder: value.folder,
            status: value.status,
            url: value.url,
            created_at: value.created_at,
        }
    }
}

/// DTO repo-facing per l'insert (lo stato iniziale è sempre pending)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateFileDTO {
    pub dealer_id: Uuid,
    pub filename: String,
    pub folder: String,
    pub url: String,
}

/// Transizione di stato richiesta da un admin
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateFileStatusDTO {
    pub status: FileStatus,
}
