//! Store traits
//!
//! One interface per entity, with CRUD plus the query methods the portal
//! actually uses. Each trait has two implementations: a Postgres-backed one
//! and an in-memory one used for demo mode and tests, selected when the
//! application state is built. Handlers only ever see the trait objects.

use crate::dtos::{
    CreateDealerDTO, CreateFileDTO, CreateMessageDTO, CreateSessionDTO, DealerStatsDTO,
    UpdateDealerDTO, UpdatePreferencesDTO,
};
use crate::entities::{
    ActiveSessionRow, Dealer, FileStatus, FileUpload, Message, UserPreferences, UserSession,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Dealer directory: listing, lookup, lifecycle and the presence queries.
///
/// `create` expects the DTO's password field to already contain the bcrypt
/// hash; hashing is the caller's job.
#[async_trait]
pub trait DealerStore: Send + Sync {
    async fn list(&self, include_inactive: bool) -> Result<Vec<Dealer>, sqlx::Error>;

    async fn read(&self, id: &Uuid) -> Result<Option<Dealer>, sqlx::Error>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Dealer>, sqlx::Error>;

    /// Partial match on name, email or company. Capped at 20 rows.
    async fn search(&self, term: &str) -> Result<Vec<Dealer>, sqlx::Error>;

    async fn create(&self, data: &CreateDealerDTO) -> Result<Dealer, sqlx::Error>;

    /// Partial update: only `Some(_)` fields are modified.
    async fn update(&self, id: &Uuid, data: &UpdateDealerDTO) -> Result<Dealer, sqlx::Error>;

    async fn delete(&self, id: &Uuid) -> Result<(), sqlx::Error>;

    /// Active dealers whose last_login is strictly after `cutoff`,
    /// most recent first.
    async fn online_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Dealer>, sqlx::Error>;

    /// Refresh last_login/last_activity to now. The presence heartbeat.
    async fn touch_last_login(&self, id: &Uuid) -> Result<(), sqlx::Error>;

    async fn stats(&self, now: DateTime<Utc>) -> Result<DealerStatsDTO, sqlx::Error>;
}

/// Directed dealer-to-dealer messages plus the derived conversation lookups.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Full ordered history between two dealers, sent_at ascending.
    async fn conversation(&self, a: &Uuid, b: &Uuid) -> Result<Vec<Message>, sqlx::Error>;

    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, sqlx::Error>;

    /// Flip read=true on exactly the given ids, restricted to messages the
    /// receiver actually received. Returns the number of rows touched.
    async fn mark_read(&self, receiver_id: &Uuid, ids: &[Uuid]) -> Result<u64, sqlx::Error>;

    /// Mark every unread message from `sender_id` to `receiver_id` as read.
    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, sqlx::Error>;

    async fn unread_count(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<i64, sqlx::Error>;

    /// Most recent message between the pair, in either direction.
    async fn last_message(&self, a: &Uuid, b: &Uuid) -> Result<Option<Message>, sqlx::Error>;
}

/// Uploaded artifacts with the three listing scopes of the portal:
/// everything (admin), one owner, approved only (public downloads).
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<FileUpload>, sqlx::Error>;

    async fn list_by_owner(&self, dealer_id: &Uuid) -> Result<Vec<FileUpload>, sqlx::Error>;

    async fn list_approved(&self) -> Result<Vec<FileUpload>, sqlx::Error>;

    async fn read(&self, id: &Uuid) -> Result<Option<FileUpload>, sqlx::Error>;

    async fn create(&self, data: &CreateFileDTO) -> Result<FileUpload, sqlx::Error>;

    async fn update_status(&self, id: &Uuid, status: FileStatus)
    -> Result<FileUpload, sqlx::Error>;
}

/// Login sessions. Best-effort bookkeeping, never part of business reads
/// except the admin's active-session view.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Close any session still open for the dealer, then open a fresh one.
    async fn open(&self, data: &CreateSessionDTO) -> Result<UserSession, sqlx::Error>;

    async fn close_for_dealer(&self, dealer_id: &Uuid) -> Result<(), sqlx::Error>;

    async fn list_active(&self) -> Result<Vec<ActiveSessionRow>, sqlx::Error>;
}

/// Per-dealer preferences with lazily created defaults.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn find_by_dealer(
        &self,
        dealer_id: &Uuid,
    ) -> Result<Option<UserPreferences>, sqlx::Error>;

    /// Insert the default row if missing; returns the stored row either way.
    async fn create_default(&self, dealer_id: &Uuid) -> Result<UserPreferences, sqlx::Error>;

    async fn update(
        &self,
        dealer_id: &Uuid,
        data: &UpdatePreferencesDTO,
    ) -> Result<UserPreferences, sqlx::Error>;
}

/// Write-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(
        &self,
        dealer_id: &Uuid,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), sqlx::Error>;
}
