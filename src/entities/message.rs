//! Message entity - Entità messaggio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direct dealer-to-dealer message. Immutable once sent, except for the
/// read flag which the receiver flips.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    // il server si aspetta una stringa ISO8601 che serde converte in DateTime UTC
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}
