//! FileUpload entity - Entità file caricato

use super::enums::FileStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dealer-owned artifact. Created pending on upload; an admin moves it to
/// approved or rejected exactly once; never otherwise mutated.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct FileUpload {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub filename: String,
    pub folder: String,
    pub status: FileStatus,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
