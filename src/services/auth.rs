//! Auth services - Login e logout con sessioni tracciate
//!
//! L'identità è un vero JWT al posto dei vecchi id sentinella cablati nel
//! client: il login verifica la password, apre una riga di sessione e
//! aggiorna last_login (la base della finestra di presenza).

use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateSessionDTO, DealerDTO};
use crate::entities::Dealer;
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// DTO per il login (solo email e password)
#[derive(serde::Deserialize)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// Risposta del login: token bearer + profilo del dealer
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LoginResponseDTO {
    pub token: String,
    pub dealer: DealerDTO,
}

#[instrument(skip(state, headers, body))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginDTO>,
) -> Result<Json<LoginResponseDTO>, AppError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::bad_request("Email is required"));
    }

    let dealer = match state.dealers.find_by_email(&email).await? {
        Some(dealer) => dealer,
        None => {
            warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized("Invalid email or password"));
        }
    };

    if state.demo {
        // Modalità demo: si può entrare come qualunque dealer seed,
        // la password non viene verificata.
        warn!("Demo mode: accepting login without password verification");
    } else if !dealer.verify_password(&body.password) {
        warn!("Password mismatch for dealer {}", dealer.id);
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    if !dealer.is_active {
        warn!("Login attempt for deactivated dealer {}", dealer.id);
        return Err(AppError::forbidden("This account has been deactivated"));
    }

    let token = encode_jwt(dealer.email.clone(), dealer.id, &state.jwt_secret)?;

    // Contorno best-effort: sessione, last_login, audit. Nessuno di questi
    // deve impedire il login.
    let session = CreateSessionDTO {
        dealer_id: dealer.id,
        ip_address: header_value(&headers, "x-forwarded-for"),
        user_agent: header_value(&headers, header::USER_AGENT.as_str()),
    };
    if let Err(e) = state.sessions.open(&session).await {
        warn!("Failed to open session: {:?}", e);
    }
    if let Err(e) = state.dealers.touch_last_login(&dealer.id).await {
        warn!("Failed to touch last_login: {:?}", e);
    }
    if let Err(e) = state
        .audit
        .record(&dealer.id, "login", json!({ "email": dealer.email }))
        .await
    {
        debug!("Failed to record login: {:?}", e);
    }

    info!("Dealer {} logged in", dealer.id);
    Ok(Json(LoginResponseDTO {
        token,
        dealer: DealerDTO::from(dealer),
    }))
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> impl IntoResponse {
    if let Err(e) = state.sessions.close_for_dealer(&current_dealer.id).await {
        warn!("Failed to close sessions on logout: {:?}", e);
    }
    info!("Dealer logged out");
    (StatusCode::OK, "Logged out")
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
