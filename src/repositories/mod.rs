//! Repositories module - Coordinatore per tutti gli store del progetto
//!
//! Ogni entità ha il proprio trait in `traits.rs` e due implementazioni:
//! quella Postgres qui sotto e quella in memoria in `memory.rs`.

// ************************* NOTA SU SQLX ************************* //
//
// Le query usano l'API runtime (sqlx::query_as::<_, T> con derive FromRow)
// e non le macro query!/query_as!: le macro verificano lo schema a compile
// time e quindi pretendono un DATABASE_URL raggiungibile anche solo per
// compilare. Questo crate deve invece compilare e partire in modalità demo
// senza alcun database. Il prezzo è che un errore di battitura nella query
// salta fuori a runtime e non in build: occhio quando le tocchi.

pub mod audit;
pub mod dealer;
pub mod file;
pub mod memory;
pub mod message;
pub mod preferences;
pub mod session;
pub mod traits;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{
    AuditStore, DealerStore, FileStore, MessageStore, PreferenceStore, SessionStore,
};

// Re-esportazione delle implementazioni
pub use audit::PgAuditStore;
pub use dealer::PgDealerStore;
pub use file::PgFileStore;
pub use memory::MemoryStore;
pub use message::PgMessageStore;
pub use preferences::PgPreferenceStore;
pub use session::PgSessionStore;
