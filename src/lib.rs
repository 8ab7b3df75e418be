//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use crate::services::root;

use axum::{
    Router, middleware,
    routing::{any, get, patch, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::authentication_middleware;
    use crate::ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/dealers", configure_dealer_routes(state.clone()))
        .nest("/chat", configure_chat_routes(state.clone()))
        .nest("/files", configure_file_routes(state.clone()))
        .nest("/preferences", configure_preference_routes(state.clone()))
        .nest("/admin", configure_admin_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .with_state(state)
}

/// Routes di autenticazione: il login è l'unica route pubblica del portale
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new().route("/login", post(login)).merge(
        Router::new()
            .route("/logout", post(logout))
            .layer(middleware::from_fn_with_state(
                state,
                authentication_middleware,
            )),
    )
}

/// Routes per anagrafica e presenza dei dealer
fn configure_dealer_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_dealers).post(create_dealer))
        .route("/online", get(get_online_dealers))
        .route("/me", get(get_me))
        .route("/me/heartbeat", post(heartbeat))
        .route("/me/avatar", post(upload_avatar))
        .route(
            "/{dealer_id}",
            get(get_dealer_by_id)
                .patch(update_dealer)
                .delete(delete_dealer),
        )
        .route("/{dealer_id}/toggle", post(toggle_dealer_status))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes per la messaggistica tra dealer
fn configure_chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_conversations))
        .route("/read", post(mark_messages_read))
        .route(
            "/{peer_id}/messages",
            get(get_conversation).post(send_message),
        )
        .route("/{peer_id}/read", post(mark_conversation_read))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes per upload, approvazione e download dei file
fn configure_file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_files).post(upload_files))
        .route("/mine", get(list_my_files))
        .route("/approved", get(list_approved_files))
        .route("/{file_id}/status", patch(update_file_status))
        .route("/{file_id}/download", get(download_file))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes per le preferenze del dealer corrente
fn configure_preference_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(get_preferences).put(update_preferences))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Routes riservate alla dashboard admin
fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/stats", get(dealer_stats))
        .route("/sessions", get(list_active_sessions))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
