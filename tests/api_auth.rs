//! Integration tests per login, logout e guardie di autenticazione

mod common;

use axum::http::{StatusCode, header};
use common::*;
use dealer_portal::dtos::{ActiveSessionDTO, DealerDTO};
use dealer_portal::repositories::memory::DEMO_ADMIN_ID;
use serde_json::json;

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let server = create_test_server(create_test_state());

    let response = server.get("/dealers").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn requests_with_a_garbage_token_are_rejected() {
    let server = create_test_server(create_test_state());

    let response = server
        .get("/dealers")
        .add_header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn the_health_check_is_public() {
    let server = create_test_server(create_test_state());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn demo_login_accepts_seeded_dealers_without_a_password_check() {
    let server = create_test_server(create_demo_state());

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "Annemiek@Dealerportaal.nl", "password": "whatever" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: dealer_portal::services::auth::LoginResponseDTO = response.json();
    assert_eq!(body.dealer.id, DEMO_ADMIN_ID);

    // il token restituito apre le route protette
    let me = server
        .get("/dealers/me")
        .add_header(header::AUTHORIZATION, bearer(&body.token))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    let me: DealerDTO = me.json();
    assert_eq!(me.email, "annemiek@dealerportaal.nl");
}

#[tokio::test]
async fn login_with_unknown_email_fails() {
    let server = create_test_server(create_demo_state());

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@nowhere.nl", "password": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_dealers_can_log_in_with_their_real_password() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let created = server
        .post("/dealers")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({
            "name": "Sanne Visser",
            "email": "sanne@visser-parts.nl",
            "password": "wachtwoord123"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let ok = server
        .post("/auth/login")
        .json(&json!({ "email": "sanne@visser-parts.nl", "password": "wachtwoord123" }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);

    let wrong = server
        .post("/auth/login")
        .json(&json!({ "email": "sanne@visser-parts.nl", "password": "verkeerd" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logging_in_again_replaces_the_previous_session() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let created = server
        .post("/dealers")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({
            "name": "Tess de Groot",
            "email": "tess@degroot-auto.nl",
            "password": "wachtwoord123"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let credentials = json!({ "email": "tess@degroot-auto.nl", "password": "wachtwoord123" });
    for _ in 0..2 {
        let login = server.post("/auth/login").json(&credentials).await;
        assert_eq!(login.status_code(), StatusCode::OK);
    }

    // due login, una sola sessione ancora aperta
    let sessions = server
        .get("/admin/sessions")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    assert_eq!(sessions.status_code(), StatusCode::OK);
    let sessions: Vec<ActiveSessionDTO> = sessions.json();
    let open: Vec<_> = sessions
        .iter()
        .filter(|s| s.dealer_email == "tess@degroot-auto.nl")
        .collect();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn logout_closes_the_open_session() {
    let server = create_test_server(create_test_state());
    let admin = admin_token();

    let created = server
        .post("/dealers")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .json(&json!({
            "name": "Rik Jansen",
            "email": "rik@jansen-trucks.nl",
            "password": "wachtwoord123"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let login = server
        .post("/auth/login")
        .json(&json!({ "email": "rik@jansen-trucks.nl", "password": "wachtwoord123" }))
        .await;
    let body: dealer_portal::services::auth::LoginResponseDTO = login.json();

    let logout = server
        .post("/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&body.token))
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);

    let sessions = server
        .get("/admin/sessions")
        .add_header(header::AUTHORIZATION, bearer(&admin))
        .await;
    let sessions: Vec<ActiveSessionDTO> = sessions.json();
    assert!(
        sessions
            .iter()
            .all(|s| s.dealer_email != "rik@jansen-trucks.nl")
    );
}

#[tokio::test]
async fn logout_requires_authentication() {
    let server = create_test_server(create_test_state());

    let anonymous = server.post("/auth/logout").await;
    assert_eq!(anonymous.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .post("/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&dealer_token()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
