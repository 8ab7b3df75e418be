use axum_test::TestServer;
use dealer_portal::core::AppState;
use dealer_portal::repositories::MemoryStore;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "een-geheim-dat-alleen-de-tests-kennen";

/// Stato su store in memoria con il set demo e scritture abilitate.
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::in_memory(
        Arc::new(MemoryStore::seeded()),
        TEST_JWT_SECRET.to_string(),
    ))
}

/// Stato in modalità demo: stesse letture, scritture bloccate.
pub fn create_demo_state() -> Arc<AppState> {
    Arc::new(AppState::demo(TEST_JWT_SECRET.to_string()))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = dealer_portal::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT valido per il dealer indicato, senza passare dal login
pub fn create_test_jwt(dealer_id: Uuid, email: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: Uuid,
        email: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: dealer_id,
        email: email.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn admin_token() -> String {
    create_test_jwt(
        dealer_portal::repositories::memory::DEMO_ADMIN_ID,
        "annemiek@dealerportaal.nl",
    )
}

pub fn dealer_token() -> String {
    create_test_jwt(
        dealer_portal::repositories::memory::DEMO_DEALER_ID,
        "jan@bakker-automotive.nl",
    )
}

pub fn manager_token() -> String {
    create_test_jwt(
        dealer_portal::repositories::memory::DEMO_MANAGER_ID,
        "pieter@vandam-trading.nl",
    )
}
