//! Session DTOs - Sessioni attive per la vista admin

use crate::entities::ActiveSessionRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActiveSessionDTO {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub dealer_name: String,
    pub dealer_email: String,
    pub dealer_profile_picture: Option<String>,
}

impl From<ActiveSessionRow> for ActiveSessionDTO {
    fn from(value: ActiveSessionRow) -> Self {
        Self {
            id: value.id,
            dealer_id: value.dealer_id,
            session_start: value.session_start,
            ip_address: value.ip_address,
            user_agent: value.user_agent,
            dealer_name: value.dealer_name,
            dealer_email: value.dealer_email,
            dealer_profile_picture: value.dealer_profile_picture,
        }
    }
}

/// DTO repo-facing per aprire una sessione
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateSessionDTO {
    pub dealer_id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
