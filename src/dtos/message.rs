//! Message DTOs - Data Transfer Objects per i messaggi

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            body: value.body,
            sent_at: value.sent_at,
            read: value.read,
        }
    }
}

/// Body della POST di invio: il destinatario viene dal path.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SendMessageDTO {
    pub body: String,
}

/// DTO repo-facing per l'insert (senza id, read parte a false)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMessageDTO {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Insieme di id da marcare come letti
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarkReadDTO {
    pub message_ids: Vec<Uuid>,
}
