//! Preference services - Preferenze del dealer corrente

use crate::core::{AppError, AppState};
use crate::dtos::{UpdatePreferencesDTO, UserPreferencesDTO};
use crate::entities::{Dealer, UserPreferences};
use axum::{
    Extension,
    extract::{Json, State},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Json<UserPreferencesDTO> {
    // Lettura con creazione lazy dei default; qualunque errore degrada ai
    // default in memoria senza toccare lo store
    let preferences = match state.preferences.find_by_dealer(&current_dealer.id).await {
        Ok(Some(preferences)) => preferences,
        Ok(None) => {
            debug!("No stored preferences, creating defaults");
            match state.preferences.create_default(&current_dealer.id).await {
                Ok(preferences) => preferences,
                Err(e) => {
                    warn!("Failed to create default preferences: {:?}", e);
                    UserPreferences::defaults(current_dealer.id, Utc::now())
                }
            }
        }
        Err(e) => {
            warn!("Failed to fetch preferences: {:?}", e);
            UserPreferences::defaults(current_dealer.id, Utc::now())
        }
    };

    Json(UserPreferencesDTO::from(preferences))
}

#[instrument(skip(state, current_dealer, body), fields(dealer_id = %current_dealer.id))]
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Json(body): Json<UpdatePreferencesDTO>,
) -> Result<Json<UserPreferencesDTO>, AppError> {
    if state.demo {
        return Err(AppError::not_configured());
    }

    // La riga potrebbe non esistere ancora per dealer storici
    if let Err(e) = state.preferences.create_default(&current_dealer.id).await {
        warn!("Failed to ensure preferences row: {:?}", e);
    }

    let preferences = state
        .preferences
        .update(&current_dealer.id, &body)
        .await?;

    Ok(Json(UserPreferencesDTO::from(preferences)))
}
