//! Dealer services - Anagrafica, presenza e gestione account

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{CreateDealerDTO, DealerDTO, DealerListQuery, UpdateDealerDTO};
use crate::entities::{Dealer, DealerRole, DealerStatus, ONLINE_WINDOW_SECS};
use crate::storage::{object_key, placeholder_url};
use axum::{
    Extension,
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn list_dealers(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Query(params): Query<DealerListQuery>,
) -> Result<Json<Vec<DealerDTO>>, AppError> {
    debug!("Listing dealers");

    // La vista completa (inattivi inclusi) è riservata agli admin
    let include_inactive = params.include_inactive.unwrap_or(false);
    if include_inactive {
        require_role(&current_dealer, &[DealerRole::Admin])?;
    }

    let result = match params.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => state.dealers.search(term).await,
        _ => state.dealers.list(include_inactive).await,
    };

    // Il path di lettura non è mai fatale: degradiamo a lista vuota
    let dealers = match result {
        Ok(dealers) => dealers,
        Err(e) => {
            warn!("Failed to fetch dealers: {:?}", e);
            Vec::new()
        }
    };

    info!("Returning {} dealers", dealers.len());
    Ok(Json(dealers.into_iter().map(DealerDTO::from).collect()))
}

/// Presenza derivata: attivi con last_login dentro la finestra di 5 minuti.
/// I client rileggono questa lista ogni 30 secondi.
#[instrument(skip(state))]
pub async fn get_online_dealers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DealerDTO>>, AppError> {
    let cutoff = Utc::now() - Duration::seconds(ONLINE_WINDOW_SECS);

    let dealers = match state.dealers.online_since(cutoff).await {
        Ok(dealers) => dealers,
        Err(e) => {
            warn!("Failed to fetch online dealers: {:?}", e);
            Vec::new()
        }
    };

    Ok(Json(dealers.into_iter().map(DealerDTO::from).collect()))
}

/// Il tocco di presenza del client (ogni 60 secondi). Sempre best-effort.
#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> StatusCode {
    if let Err(e) = state.dealers.touch_last_login(&current_dealer.id).await {
        warn!("Failed to update last login: {:?}", e);
    }
    StatusCode::NO_CONTENT
}

#[instrument(skip(current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn get_me(Extension(current_dealer): Extension<Dealer>) -> Json<DealerDTO> {
    Json(DealerDTO::from(current_dealer))
}

#[instrument(skip(state), fields(dealer_id = %dealer_id))]
pub async fn get_dealer_by_id(
    State(state): State<Arc<AppState>>,
    Path(dealer_id): Path<Uuid>,
) -> Result<Json<Option<DealerDTO>>, AppError> {
    debug!("Fetching dealer by ID");
    let dealer = match state.dealers.read(&dealer_id).await {
        Ok(dealer) => dealer,
        Err(e) => {
            warn!("Failed to fetch dealer: {:?}", e);
            None
        }
    };
    Ok(Json(dealer.map(DealerDTO::from)))
}

#[instrument(skip(state, current_dealer, body), fields(admin_id = %current_dealer.id))]
pub async fn create_dealer(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Json(mut body): Json<CreateDealerDTO>,
) -> Result<(StatusCode, Json<DealerDTO>), AppError> {
    debug!("Creating new dealer");
    require_role(&current_dealer, &[DealerRole::Admin])?;

    if state.demo {
        return Err(AppError::not_configured());
    }

    // Validazione con validator (nome, email, lunghezza password)
    body.validate()?;
    body.email = body.email.trim().to_lowercase();
    body.name = body.name.trim().to_string();

    // Controllo esplicito del duplicato prima dell'insert, per dare un
    // messaggio chiaro invece del generico errore di vincolo
    if state.dealers.find_by_email(&body.email).await?.is_some() {
        warn!("Dealer with this email already exists");
        return Err(AppError::conflict(
            "A dealer with this email address already exists",
        ));
    }

    let password_hash = Dealer::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;
    body.password = password_hash;

    let dealer = state.dealers.create(&body).await?;

    // Preferenze di default: best-effort, non blocca la creazione
    if let Err(e) = state.preferences.create_default(&dealer.id).await {
        warn!("Failed to create default preferences: {:?}", e);
    }

    info!("Dealer {} created", dealer.id);
    Ok((StatusCode::CREATED, Json(DealerDTO::from(dealer))))
}

#[instrument(skip(state, current_dealer, body), fields(admin_id = %current_dealer.id, dealer_id = %dealer_id))]
pub async fn update_dealer(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(dealer_id): Path<Uuid>,
    Json(mut body): Json<UpdateDealerDTO>,
) -> Result<Json<DealerDTO>, AppError> {
    debug!("Updating dealer");
    require_role(&current_dealer, &[DealerRole::Admin])?;

    if state.demo {
        return Err(AppError::not_configured());
    }

    body.validate()?;
    if let Some(email) = body.email.as_mut() {
        *email = email.trim().to_lowercase();
    }

    // Status e is_active viaggiano in coppia
    if let Some(status) = body.status {
        body.is_active.get_or_insert(status == DealerStatus::Active);
    }

    let dealer = state.dealers.update(&dealer_id, &body).await?;
    info!("Dealer updated");
    Ok(Json(DealerDTO::from(dealer)))
}

#[instrument(skip(state, current_dealer), fields(admin_id = %current_dealer.id, dealer_id = %dealer_id))]
pub async fn toggle_dealer_status(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(dealer_id): Path<Uuid>,
) -> Result<Json<DealerDTO>, AppError> {
    debug!("Toggling dealer status");
    require_role(&current_dealer, &[DealerRole::Admin])?;

    if state.demo {
        return Err(AppError::not_configured());
    }

    let dealer = state
        .dealers
        .read(&dealer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dealer not found"))?;

    let now_active = !dealer.is_active;
    let updates = UpdateDealerDTO {
        is_active: Some(now_active),
        status: Some(if now_active {
            DealerStatus::Active
        } else {
            DealerStatus::Inactive
        }),
        ..Default::default()
    };

    let updated = state.dealers.update(&dealer_id, &updates).await?;
    info!("Dealer status toggled to {:?}", updated.status);
    Ok(Json(DealerDTO::from(updated)))
}

#[instrument(skip(state, current_dealer), fields(admin_id = %current_dealer.id, dealer_id = %dealer_id))]
pub async fn delete_dealer(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(dealer_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("Deleting dealer");
    require_role(&current_dealer, &[DealerRole::Admin])?;

    if state.demo {
        return Err(AppError::not_configured());
    }

    state.dealers.delete(&dealer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Carica la foto profilo nel bucket avatars e aggiorna il dealer.
#[instrument(skip(state, current_dealer, multipart), fields(dealer_id = %current_dealer.id))]
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    mut multipart: Multipart,
) -> Result<Json<DealerDTO>, AppError> {
    debug!("Uploading avatar");

    if state.demo {
        return Err(AppError::not_configured());
    }

    let mut uploaded: Option<(String, Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Invalid multipart data: {:?}", e);
        AppError::bad_request("Invalid multipart data")
    })? {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| {
                    warn!("Failed to read avatar bytes: {:?}", e);
                    AppError::bad_request("Failed to read uploaded file")
                })?
                .to_vec();
            uploaded = Some((filename, content_type, bytes));
        }
    }

    let (filename, content_type, bytes) =
        uploaded.ok_or_else(|| AppError::bad_request("No file provided"))?;

    let key = object_key(
        &current_dealer.id.to_string(),
        &filename,
        Utc::now().timestamp_millis(),
    );

    // Un solo PUT best-effort: se lo storage non collabora si ripiega sul
    // placeholder, come faceva la vecchia UI
    let url = match state.avatars.upload(&key, bytes, content_type).await {
        Ok(url) => url,
        Err(e) => {
            warn!("Avatar upload failed, using placeholder: {:?}", e);
            placeholder_url(&filename)
        }
    };

    let updates = UpdateDealerDTO {
        profile_picture: Some(url),
        ..Default::default()
    };
    let dealer = state.dealers.update(&current_dealer.id, &updates).await?;

    info!("Avatar updated");
    Ok(Json(DealerDTO::from(dealer)))
}
