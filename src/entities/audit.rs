//! ActivityLog entity - Traccia di audit best-effort
//!
//! Scritta da login, chat, upload e download; mai riletta dalla logica
//! di business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub action: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
