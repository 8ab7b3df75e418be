//! UserSession entity - Sessioni di login dei dealer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct UserSession {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: bool,
}

/// Active session joined with the owning dealer, for the admin view.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ActiveSessionRow {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub dealer_name: String,
    pub dealer_email: String,
    pub dealer_profile_picture: Option<String>,
}
