//! WebSocket Connection Management - Gestione connessioni WebSocket

use crate::core::AppState;
use crate::ws::TIMEOUT_DURATION_SECONDS;
use crate::ws::connection_map::InternalSignal;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::{Duration, timeout};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(ws, state), fields(dealer_id = %dealer_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, dealer_id: Uuid) {
    info!("WebSocket connection established");

    // Dividiamo il WebSocket in due metà: sender e receiver
    let (ws_tx, ws_rx) = ws.split();

    // Canale interno: i service spingono eventi qui tramite la ConnectionMap
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    state.connections.register(dealer_id, int_tx.clone());

    // Task in ascolto del socket (chiusure e input del client)
    tokio::spawn(listen_ws(dealer_id, ws_rx, int_tx, state.clone()));

    // Task che scrive verso il client gli eventi ricevuti dal canale interno
    tokio::spawn(write_ws(dealer_id, ws_tx, int_rx));
}

#[instrument(skip(websocket_tx, internal_rx), fields(dealer_id = %dealer_id))]
pub async fn write_ws(
    dealer_id: Uuid,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    internal_rx: UnboundedReceiver<InternalSignal>,
) {
    info!("Write task started");

    let mut signals = UnboundedReceiverStream::new(internal_rx);

    while let Some(signal) = signals.next().await {
        match signal {
            InternalSignal::Event(event) => {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to serialize event: {:?}", e);
                        continue;
                    }
                };
                if let Err(e) = websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await {
                    warn!("Failed to push event, closing connection: {:?}", e);
                    break;
                }
            }
            InternalSignal::Shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Write task terminated");
}

#[instrument(skip(websocket_rx, internal_tx, state), fields(dealer_id = %dealer_id))]
pub async fn listen_ws(
    dealer_id: Uuid,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: tokio::sync::mpsc::UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(msg_result)) => {
                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    // Il canale è push-only: i messaggi si inviano via REST.
                    Message::Text(_) => {
                        debug!("Ignoring inbound text frame on push-only channel");
                    }
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(
                    timeout_secs = TIMEOUT_DURATION_SECONDS,
                    "Connection timeout"
                );
                break;
            }
        }
    }

    // Cleanup
    info!("Cleaning up connection");
    let _ = internal_tx.send(InternalSignal::Shutdown);
    state.connections.remove(&dealer_id);
    info!("Listen task terminated");
}
