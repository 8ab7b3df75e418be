//! Dealer entity - Entità dealer con metodi per password e presenza

use super::enums::{DealerRole, DealerStatus};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Finestra di presenza: un dealer è "online" se il suo ultimo login
/// è strettamente entro questi secondi. I client rileggono la lista ogni 30s.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Dealer {
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
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl Dealer {
    /// Presence is derived, never stored: online means the last login
    /// happened strictly less than ONLINE_WINDOW_SECS ago.
    pub fn is_online(&self, now: DateTime<Utc>) -> bool {
        match self.last_login {
            Some(last_login) => now - last_login < Duration::seconds(ONLINE_WINDOW_SECS),
            None => false,
        }
    }

    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password_hash).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hashed = hash(password, DEFAULT_COST)?;
        Ok(hashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealer_logged_in_at(last_login: Option<DateTime<Utc>>) -> Dealer {
        Dealer {
            id: Uuid::from_u128(1),
            name: "Test Dealer".to_string(),
            email: "test@dealer.example".to_string(),
            phone: None,
            company: None,
            role: DealerRole::Dealer,
            status: DealerStatus::Active,
            is_active: true,
            profile_picture: None,
            notes: None,
            password_hash: String::new(),
            created_at: Utc::now(),
            registration_date: Utc::now(),
            last_login,
            last_activity: None,
        }
    }

    #[test]
    fn online_just_inside_the_window() {
        let now = Utc::now();
        let dealer = dealer_logged_in_at(Some(now - Duration::seconds(ONLINE_WINDOW_SECS - 1)));
        assert!(dealer.is_online(now));
    }

    #[test]
    fn offline_at_exactly_five_minutes() {
        let now = Utc::now();
        let dealer = dealer_logged_in_at(Some(now - Duration::seconds(ONLINE_WINDOW_SECS)));
        assert!(!dealer.is_online(now));
    }

    #[test]
    fn offline_one_second_past_the_window() {
        let now = Utc::now();
        let dealer = dealer_logged_in_at(Some(now - Duration::seconds(ONLINE_WINDOW_SECS + 1)));
        assert!(!dealer.is_online(now));
    }

    #[test]
    fn offline_without_any_login() {
        assert!(!dealer_logged_in_at(None).is_online(Utc::now()));
    }
}
