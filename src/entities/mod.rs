//! Entities module - Entità del dominio del portale
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod audit;
pub mod dealer;
pub mod enums;
pub mod file_upload;
pub mod message;
pub mod preferences;
pub mod session;

// Re-exports per facilitare l'import
pub use audit::ActivityLog;
pub use dealer::{Dealer, ONLINE_WINDOW_SECS};
pub use enums::{DealerRole, DealerStatus, FileStatus};
pub use file_upload::FileUpload;
pub use message::Message;
pub use preferences::UserPreferences;
pub use session::{ActiveSessionRow, UserSession};
