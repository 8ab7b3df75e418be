//! WebSocket Module - Canale push per la consegna realtime
//!
//! Sostituisce il change-feed del database ospitato: quando un messaggio
//! viene scritto, i partecipanti con un socket aperto ricevono l'evento.
//! Il canale è push-only: se la connessione manca o cade, il client
//! continua a funzionare col polling REST, senza errori visibili.

pub mod connection;
pub mod connection_map;

// Re-exports pubblici
pub use connection::handle_socket;
pub use connection_map::{ConnectionMap, InternalSignal};

/// Un socket che non invia alcun frame (nemmeno un close) entro questa
/// finestra viene smontato; il client rientra col polling REST e può
/// riaprire la connessione quando vuole.
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

use crate::{core::AppState, entities::Dealer};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Entry point per gestire richieste di upgrade WebSocket.
/// L'identità arriva dal middleware JWT, non dal socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Response {
    let dealer_id = current_dealer.id;

    // Se l'upgrade fallisce axum risponde da solo con un errore;
    // altrimenti la connessione passa ad handle_socket.
    ws.on_upgrade(move |socket| handle_socket(socket, state, dealer_id))
}
