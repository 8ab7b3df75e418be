use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dtos::WsEventDTO;

pub enum InternalSignal {
    Event(WsEventDTO),
    Shutdown,
}

/// Mappa concorrente dealer_id -> sender del task di scrittura WebSocket.
/// Nota: "connesso" qui significa socket aperto, non "online" nel senso
/// della finestra di presenza sui last_login.
pub struct ConnectionMap {
    connected: DashMap<Uuid, UnboundedSender<InternalSignal>>,
}

impl ConnectionMap {
    pub fn new() -> Self {
        ConnectionMap {
            connected: DashMap::new(),
        }
    }

    #[instrument(skip(self, tx), fields(dealer_id = %dealer_id))]
    pub fn register(&self, dealer_id: Uuid, tx: UnboundedSender<InternalSignal>) {
        info!("Registering dealer WebSocket connection");
        self.connected.insert(dealer_id, tx);
        debug!("Open connections: {}", self.connected.len());
    }

    #[instrument(skip(self), fields(dealer_id = %dealer_id))]
    pub fn remove(&self, dealer_id: &Uuid) {
        info!("Removing dealer WebSocket connection");
        self.connected.remove(dealer_id);
    }

    /// Consegna best-effort: un dealer senza socket aperto viene saltato in
    /// silenzio, recupererà l'evento al prossimo poll REST.
    #[instrument(skip(self, event), fields(dealer_id = %dealer_id))]
    pub fn notify(&self, dealer_id: &Uuid, event: WsEventDTO) {
        if let Some(entry) = self.connected.get(dealer_id) {
            if let Err(e) = entry.value().send(InternalSignal::Event(event)) {
                warn!("Failed to push event to connected dealer: {:?}", e);
            }
        } else {
            debug!("Dealer not connected, event not pushed");
        }
    }

    pub fn is_connected(&self, dealer_id: &Uuid) -> bool {
        self.connected.contains_key(dealer_id)
    }

    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }
}

impl Default for ConnectionMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn notify_reaches_only_the_registered_dealer() {
        let map = ConnectionMap::new();
        let (tx, mut rx) = unbounded_channel();
        let connected = Uuid::from_u128(1);
        let absent = Uuid::from_u128(2);

        map.register(connected, tx);
        assert!(map.is_connected(&connected));
        assert!(!map.is_connected(&absent));

        map.notify(
            &absent,
            WsEventDTO::Error {
                code: 0,
                message: "ignored".to_string(),
            },
        );
        map.notify(
            &connected,
            WsEventDTO::ConversationRead {
                reader_id: absent,
                peer_id: connected,
            },
        );

        match rx.recv().await {
            Some(InternalSignal::Event(WsEventDTO::ConversationRead { reader_id, .. })) => {
                assert_eq!(reader_id, absent)
            }
            _ => panic!("expected the conversation_read event"),
        }
        assert!(rx.try_recv().is_err());

        map.remove(&connected);
        assert_eq!(map.connected_count(), 0);
    }
}
