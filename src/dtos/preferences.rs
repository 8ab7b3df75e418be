//! Preferences DTOs

use crate::entities::UserPreferences;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserPreferencesDTO {
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

impl From<UserPreferences> for UserPreferencesDTO {
    fn from(value: UserPreferences) -> Self {
        Self {
            id: value.id,
            dealer_id: value.dealer_id,
            language: value.language,
            theme: value.theme,
            notifications_enabled: value.notifications_enabled,
            email_notifications: value.email_notifications,
            chat_notifications: value.chat_notifications,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Aggiornamento parziale: i campi None restano invariati.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdatePreferencesDTO {
    pub language: Option<String>,
    pub theme: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
    pub chat_notifications: Option<bool>,
}
