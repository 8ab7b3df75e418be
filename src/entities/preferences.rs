//! UserPreferences entity - Preferenze per dealer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct UserPreferences {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub language: String,
    pub theme: String,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub chat_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    /// Defaults handed out when a dealer has no stored preferences yet.
    /// The portal ships Dutch-first with a light theme.
    pub fn defaults(dealer_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dealer_id,
            language: "nl".to_string(),
            theme: "light".to_string(),
            notifications_enabled: true,
            email_notifications: true,
            chat_notifications: true,
            created_at: now,
            updated_at: now,
        }
    }
}
