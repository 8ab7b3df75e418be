//! Integration tests per le preferenze del dealer corrente

mod common;

use axum::http::{StatusCode, header};
use common::*;
use dealer_portal::dtos::UserPreferencesDTO;
use dealer_portal::repositories::memory::DEMO_DEALER_ID;
use serde_json::json;

#[tokio::test]
async fn the_first_read_hands_out_the_dutch_defaults() {
    let server = create_test_server(create_test_state());

    let response = server
        .get("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let preferences: UserPreferencesDTO = response.json();
    assert_eq!(preferences.dealer_id, DEMO_DEALER_ID);
    assert_eq!(preferences.language, "nl");
    assert_eq!(preferences.theme, "light");
    assert!(preferences.notifications_enabled);
    assert!(preferences.email_notifications);
    assert!(preferences.chat_notifications);
}

#[tokio::test]
async fn updates_are_partial_and_persisted() {
    let server = create_test_server(create_test_state());
    let jan = dealer_token();

    let response = server
        .put("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .json(&json!({ "theme": "dark", "chat_notifications": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated: UserPreferencesDTO = response.json();
    assert_eq!(updated.theme, "dark");
    assert!(!updated.chat_notifications);
    // i campi non inviati restano invariati
    assert_eq!(updated.language, "nl");
    assert!(updated.email_notifications);

    let read_back = server
        .get("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .await;
    let preferences: UserPreferencesDTO = read_back.json();
    assert_eq!(preferences.theme, "dark");
    assert!(preferences.updated_at >= preferences.created_at);
}

#[tokio::test]
async fn preferences_are_scoped_to_the_caller() {
    let server = create_test_server(create_test_state());

    let response = server
        .put("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .json(&json!({ "language": "en" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // la riga del manager non è stata toccata
    let other = server
        .get("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&manager_token()))
        .await;
    let preferences: UserPreferencesDTO = other.json();
    assert_eq!(preferences.language, "nl");
}

#[tokio::test]
async fn demo_mode_serves_defaults_but_blocks_updates() {
    let server = create_test_server(create_demo_state());
    let jan = dealer_token();

    let read = server
        .get("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .await;
    assert_eq!(read.status_code(), StatusCode::OK);

    let blocked = server
        .put("/preferences")
        .add_header(header::AUTHORIZATION, bearer(&jan))
        .json(&json!({ "theme": "dark" }))
        .await;
    assert_eq!(blocked.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(blocked.text().contains("Database not configured"));
}
