//! Dealer DTOs - Data Transfer Objects per i dealer

use crate::entities::{Dealer, DealerRole, DealerStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Struct per gestire io col client. L'hash della password non lascia mai il server.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DealerDTO {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub role: DealerRole,
    pub status: DealerStatus,
    pub is_active: bool,
    pub profile_picture: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl From<Dealer> for DealerDTO {
    fn from(value: Dealer) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            role: value.role,
            status: value.status,
            is_active: value.is_active,
            profile_picture: value.profile_picture,
            notes: value.notes,
            created_at: value.created_at,
            registration_date: value.registration_date,
            last_login: value.last_login,
            last_activity: value.last_activity,
        }
    }
}

/// DTO per creare un nuovo dealer (solo admin). Il campo password arriva in
/// chiaro dal client e viene sostituito con l'hash prima di toccare lo store.
#[derive(Serialize, Deserialize, Debug, Clone, validator::Validate)]
pub struct CreateDealerDTO {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub role: DealerRole,
    pub profile_picture: Option<String>,
    pub notes: Option<String>,
}

/// DTO per aggiornamenti parziali: i campi None restano invariati.
#[derive(Serialize, Deserialize, Debug, Clone, Default, validator::Validate)]
pub struct UpdateDealerDTO {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub role: Option<DealerRole>,
    pub profile_picture: Option<String>,
    pub notes: Option<String>,
    pub status: Option<DealerStatus>,
    pub is_active: Option<bool>,
}

/// Aggregato derivato per la dashboard admin.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerStatsDTO {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub new_this_week: i64,
    pub online_now: i64,
}
