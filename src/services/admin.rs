//! Admin services - Dashboard di amministrazione

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{ActiveSessionDTO, DealerStatsDTO};
use crate::entities::{Dealer, DealerRole};
use axum::{
    Extension,
    extract::{Json, State},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Contatori per le tile della dashboard. Come ogni lettura, degrada a
/// zeri invece di fallire.
#[instrument(skip(state, current_dealer), fields(admin_id = %current_dealer.id))]
pub async fn dealer_stats(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Result<Json<DealerStatsDTO>, AppError> {
    require_role(&current_dealer, &[DealerRole::Admin])?;

    let stats = match state.dealers.stats(Utc::now()).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Failed to compute dealer stats: {:?}", e);
            DealerStatsDTO::default()
        }
    };

    Ok(Json(stats))
}

#[instrument(skip(state, current_dealer), fields(admin_id = %current_dealer.id))]
pub async fn list_active_sessions(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Result<Json<Vec<ActiveSessionDTO>>, AppError> {
    require_role(&current_dealer, &[DealerRole::Admin])?;

    let sessions = match state.sessions.list_active().await {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Failed to fetch active sessions: {:?}", e);
            Vec::new()
        }
    };

    Ok(Json(
        sessions.into_iter().map(ActiveSessionDTO::from).collect(),
    ))
}
