//! WebSocket Event DTOs - Eventi push verso i client connessi
//!
//! Tagged union: serde serializza come
//! { "type": "new_message", "data": { ... } }

use crate::dtos::MessageDTO;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WsEventDTO {
    NewMessage(MessageDTO),
    ConversationRead { reader_id: Uuid, peer_id: Uuid },
    Error { code: u16, message: String },
}
