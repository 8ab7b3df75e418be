//! Conversation DTOs - Riassunto di conversazione per la lista chat

use crate::dtos::{DealerDTO, MessageDTO};
use serde::{Deserialize, Serialize};

/// Derived view: the other dealer, the most recent message between the two
/// parties (if any) and how many of their messages are still unread.
/// Never persisted, recomputed on every read.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationSummaryDTO {
    pub dealer: DealerDTO,
    pub last_message: Option<MessageDTO>,
    pub unread_count: i64,
}
