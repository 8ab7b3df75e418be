//! Chat services - Conversazioni dirette tra dealer
//!
//! La history e i riassunti sono semplici letture; la consegna realtime
//! passa dalla ConnectionMap e il client che non ha un socket aperto
//! recupera tutto col polling di queste stesse route.

use crate::core::{AppError, AppState};
use crate::dtos::{
    ConversationSummaryDTO, CreateMessageDTO, DealerDTO, MarkReadDTO, MessageDTO, SendMessageDTO,
    WsEventDTO,
};
use crate::entities::Dealer;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use futures::future;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id))]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
) -> Result<Json<Vec<ConversationSummaryDTO>>, AppError> {
    debug!("Building conversation summaries");

    // 1. Tutti i dealer attivi tranne il chiamante
    // 2. Per ciascuno: ultimo messaggio + conteggio non letti (query concorrenti)
    // 3. Ordinamento: ultimo messaggio più recente prima, coppie senza
    //    messaggi in coda in ordine di nome (deterministico)
    let dealers = match state.dealers.list(false).await {
        Ok(dealers) => dealers,
        Err(e) => {
            warn!("Failed to fetch dealers for summaries: {:?}", e);
            Vec::new()
        }
    };

    let me = current_dealer.id;
    let peers = dealers.into_iter().filter(|d| d.id != me);

    let summaries = future::join_all(peers.map(|peer| {
        let state = state.clone();
        async move {
            let (last_message, unread_count) = future::join(
                state.messages.last_message(&me, &peer.id),
                state.messages.unread_count(&me, &peer.id),
            )
            .await;

            let last_message = last_message.unwrap_or_else(|e| {
                warn!("Failed to fetch last message: {:?}", e);
                None
            });
            let unread_count = unread_count.unwrap_or_else(|e| {
                warn!("Failed to fetch unread count: {:?}", e);
                0
            });

            ConversationSummaryDTO {
                dealer: DealerDTO::from(peer),
                last_message: last_message.map(MessageDTO::from),
                unread_count,
            }
        }
    }))
    .await;

    let mut summaries = summaries;
    sort_summaries(&mut summaries);

    info!("Returning {} conversation summaries", summaries.len());
    Ok(Json(summaries))
}

/// Più recente prima; le coppie senza alcun messaggio vanno dopo tutte
/// quelle con messaggi, ordinate per nome.
fn sort_summaries(summaries: &mut [ConversationSummaryDTO]) {
    summaries.sort_by(|a, b| match (&a.last_message, &b.last_message) {
        (Some(x), Some(y)) => y
            .sent_at
            .cmp(&x.sent_at)
            .then_with(|| a.dealer.name.cmp(&b.dealer.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.dealer.name.cmp(&b.dealer.name),
    });
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id, peer_id = %peer_id))]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    debug!("Fetching conversation history");

    let messages = match state
        .messages
        .conversation(&current_dealer.id, &peer_id)
        .await
    {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Failed to fetch conversation: {:?}", e);
            Vec::new()
        }
    };

    info!("Retrieved {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

#[instrument(skip(state, current_dealer, body), fields(dealer_id = %current_dealer.id, peer_id = %peer_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(peer_id): Path<Uuid>,
    Json(body): Json<SendMessageDTO>,
) -> Result<impl IntoResponse, AppError> {
    // Testo vuoto o solo spazi: nessuna riga, nessun errore
    let text = body.body.trim();
    if text.is_empty() {
        debug!("Ignoring blank message");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    if state.demo {
        return Err(AppError::not_configured());
    }

    if current_dealer.id == peer_id {
        return Err(AppError::bad_request("Cannot send a message to yourself"));
    }

    // Il destinatario deve esistere
    if state.dealers.read(&peer_id).await?.is_none() {
        warn!("Message to unknown dealer");
        return Err(AppError::not_found("Receiver not found"));
    }

    let new_message = CreateMessageDTO {
        sender_id: current_dealer.id,
        receiver_id: peer_id,
        body: text.to_string(),
        sent_at: Utc::now(),
    };
    let message = state.messages.create(&new_message).await?;

    if let Err(e) = state
        .audit
        .record(
            &current_dealer.id,
            "message_sent",
            json!({ "receiver_id": peer_id, "message_id": message.id }),
        )
        .await
    {
        debug!("Failed to record chat action: {:?}", e);
    }

    // Push realtime verso entrambe le parti: chi è senza socket recupererà
    // il messaggio al prossimo refresh
    let dto = MessageDTO::from(message);
    state
        .connections
        .notify(&peer_id, WsEventDTO::NewMessage(dto.clone()));
    state
        .connections
        .notify(&current_dealer.id, WsEventDTO::NewMessage(dto.clone()));

    info!("Message sent");
    Ok((StatusCode::CREATED, Json(dto)).into_response())
}

#[instrument(skip(state, current_dealer, body), fields(dealer_id = %current_dealer.id))]
pub async fn mark_messages_read(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Json(body): Json<MarkReadDTO>,
) -> StatusCode {
    if body.message_ids.is_empty() || state.demo {
        return StatusCode::NO_CONTENT;
    }

    // Silenzioso come l'originale: un fallimento lascia i flag stantii
    match state
        .messages
        .mark_read(&current_dealer.id, &body.message_ids)
        .await
    {
        Ok(touched) => debug!("Marked {} messages as read", touched),
        Err(e) => warn!("Failed to mark messages as read: {:?}", e),
    }

    StatusCode::NO_CONTENT
}

#[instrument(skip(state, current_dealer), fields(dealer_id = %current_dealer.id, peer_id = %peer_id))]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Extension(current_dealer): Extension<Dealer>,
    Path(peer_id): Path<Uuid>,
) -> StatusCode {
    if state.demo {
        return StatusCode::NO_CONTENT;
    }

    match state
        .messages
        .mark_conversation_read(&current_dealer.id, &peer_id)
        .await
    {
        Ok(touched) => {
            debug!("Marked {} messages as read", touched);
            if let Err(e) = state
                .audit
                .record(
                    &current_dealer.id,
                    "conversation_read",
                    json!({ "peer_id": peer_id }),
                )
                .await
            {
                debug!("Failed to record chat action: {:?}", e);
            }
            // Ricevuta di lettura per il mittente, se connesso
            state.connections.notify(
                &peer_id,
                WsEventDTO::ConversationRead {
                    reader_id: current_dealer.id,
                    peer_id,
                },
            );
        }
        Err(e) => warn!("Failed to mark conversation as read: {:?}", e),
    }

    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DealerRole, DealerStatus};
    use chrono::{DateTime, Duration};

    fn dealer_dto(name: &str) -> DealerDTO {
        let now = Utc::now();
        DealerDTO {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@test.nl", name.to_lowercase()),
            phone: None,
            company: None,
            role: DealerRole::Dealer,
            status: DealerStatus::Active,
            is_active: true,
            profile_picture: None,
            notes: None,
            created_at: now,
            registration_date: now,
            last_login: None,
            last_activity: None,
        }
    }

    fn summary(
        name: &str,
        last_sent_at: Option<DateTime<Utc>>,
        unread_count: i64,
    ) -> ConversationSummaryDTO {
        let dealer = dealer_dto(name);
        ConversationSummaryDTO {
            last_message: last_sent_at.map(|sent_at| MessageDTO {
                id: Uuid::new_v4(),
                sender_id: dealer.id,
                receiver_id: Uuid::new_v4(),
                body: "hoi".to_string(),
                sent_at,
                read: false,
            }),
            dealer,
            unread_count,
        }
    }

    #[test]
    fn summaries_sort_most_recent_first() {
        let now = Utc::now();
        let mut summaries = vec![
            summary("Anna", Some(now - Duration::hours(3)), 0),
            summary("Bram", Some(now), 2),
            summary("Carla", Some(now - Duration::hours(1)), 1),
        ];
        sort_summaries(&mut summaries);

        let names: Vec<&str> = summaries.iter().map(|s| s.dealer.name.as_str()).collect();
        assert_eq!(names, ["Bram", "Carla", "Anna"]);
    }

    #[test]
    fn peers_without_messages_sort_after_all_others_by_name() {
        let now = Utc::now();
        let mut summaries = vec![
            summary("Zeno", None, 0),
            summary("Anna", None, 0),
            summary("Bram", Some(now - Duration::days(30)), 0),
        ];
        sort_summaries(&mut summaries);

        let names: Vec<&str> = summaries.iter().map(|s| s.dealer.name.as_str()).collect();
        assert_eq!(names, ["Bram", "Anna", "Zeno"]);
    }
}
