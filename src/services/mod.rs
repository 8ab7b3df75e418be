//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica area del portale.
//!
//! Politica errori (uniforme in tutto il modulo): le letture non falliscono
//! mai verso il client, degradano a liste vuote loggando un warning; le
//! scritture sulle entità principali propagano AppError; le scritture
//! periferiche (audit, sessioni, heartbeat, preferenze di default) sono
//! best-effort e non bloccano mai l'operazione principale.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod dealer;
pub mod file;
pub mod preferences;

// Re-exports per facilitare l'import
pub use admin::{dealer_stats, list_active_sessions};
pub use auth::{login, logout};
pub use chat::{
    get_conversation, list_conversations, mark_conversation_read, mark_messages_read,
    send_message,
};
pub use dealer::{
    create_dealer, delete_dealer, get_dealer_by_id, get_me, get_online_dealers, heartbeat,
    list_dealers, toggle_dealer_status, update_dealer, upload_avatar,
};
pub use file::{
    download_file, list_approved_files, list_files, list_my_files, update_file_status,
    upload_files,
};
pub use preferences::{get_preferences, update_preferences};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Dealer portal is running!")
}
