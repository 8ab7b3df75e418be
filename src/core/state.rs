//! Application State - Stato globale dell'applicazione
//!
//! Contiene gli store (come trait object, così la stessa applicazione gira
//! su Postgres o sui dati demo in memoria), lo storage oggetti, la secret
//! JWT e la mappa delle connessioni WebSocket.

use crate::repositories::{
    AuditStore, DealerStore, FileStore, MemoryStore, MessageStore, PgAuditStore, PgDealerStore,
    PgFileStore, PgMessageStore, PgPreferenceStore, PgSessionStore, PreferenceStore, SessionStore,
};
use crate::storage::{FileStorage, PlaceholderStorage};
use crate::ws::ConnectionMap;
use sqlx::PgPool;
use std::sync::Arc;

pub struct AppState {
    /// Store per la gestione dei dealer
    pub dealers: Arc<dyn DealerStore>,

    /// Store per la gestione dei messaggi
    pub messages: Arc<dyn MessageStore>,

    /// Store per la gestione dei file
    pub files: Arc<dyn FileStore>,

    /// Store per le sessioni di login
    pub sessions: Arc<dyn SessionStore>,

    /// Store per le preferenze
    pub preferences: Arc<dyn PreferenceStore>,

    /// Traccia di audit best-effort
    pub audit: Arc<dyn AuditStore>,

    /// Bucket "uploads" per i file dei dealer
    pub uploads: Arc<dyn FileStorage>,

    /// Bucket "avatars" per le foto profilo
    pub avatars: Arc<dyn FileStorage>,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Modalità demo: nessun database, letture dal set mock,
    /// scritture sulle entità principali rifiutate.
    pub demo: bool,

    /// Mappa concorrente dei dealer con un WebSocket aperto.
    /// Key: dealer_id, Value: sender verso il task di scrittura.
    pub connections: ConnectionMap,
}

impl AppState {
    /// Stato di produzione: tutti gli store su Postgres.
    pub fn with_database(
        pool: PgPool,
        jwt_secret: String,
        uploads: Arc<dyn FileStorage>,
        avatars: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            dealers: Arc::new(PgDealerStore::new(pool.clone())),
            messages: Arc::new(PgMessageStore::new(pool.clone())),
            files: Arc::new(PgFileStore::new(pool.clone())),
            sessions: Arc::new(PgSessionStore::new(pool.clone())),
            preferences: Arc::new(PgPreferenceStore::new(pool.clone())),
            audit: Arc::new(PgAuditStore::new(pool)),
            uploads,
            avatars,
            jwt_secret,
            demo: false,
            connections: ConnectionMap::new(),
        }
    }

    /// Modalità demo: dati mock in memoria, storage placeholder,
    /// scritture sulle entità principali bloccate nei service.
    pub fn demo(jwt_secret: String) -> Self {
        let mut state = Self::in_memory(Arc::new(MemoryStore::seeded()), jwt_secret);
        state.demo = true;
        state
    }

    /// Stato su store in memoria con scritture abilitate (usato nei test).
    pub fn in_memory(store: Arc<MemoryStore>, jwt_secret: String) -> Self {
        Self {
            dealers: store.clone(),
            messages: store.clone(),
            files: store.clone(),
            sessions: store.clone(),
            preferences: store.clone(),
            audit: store,
            uploads: Arc::new(PlaceholderStorage),
            avatars: Arc::new(PlaceholderStorage),
            jwt_secret,
            demo: false,
            connections: ConnectionMap::new(),
        }
    }
}
