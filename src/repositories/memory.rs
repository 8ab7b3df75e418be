//! MemoryStore - Implementazione in memoria di tutti gli store
//!
//! Sostituisce i vecchi array mock globali: un'unica struttura iniettata
//! come trait object quando il database non è configurato (modalità demo)
//! e nei test di integrazione. I dati vivono solo finché vive il processo.

use super::traits::{
    AuditStore, DealerStore, FileStore, MessageStore, PreferenceStore, SessionStore,
};
use crate::dtos::{
    CreateDealerDTO, CreateFileDTO, CreateMessageDTO, CreateSessionDTO, DealerStatsDTO,
    UpdateDealerDTO, UpdatePreferencesDTO,
};
use crate::entities::{
    ActiveSessionRow, ActivityLog, Dealer, DealerRole, DealerStatus, FileStatus, FileUpload,
    Message, ONLINE_WINDOW_SECS, UserPreferences, UserSession,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sqlx::Error;
use std::sync::Mutex;
use uuid::Uuid;

// Identità fisse del set demo, comode anche nei test.
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0xA001);
pub const DEMO_DEALER_ID: Uuid = Uuid::from_u128(0xA002);
pub const DEMO_MANAGER_ID: Uuid = Uuid::from_u128(0xA003);

pub struct MemoryStore {
    dealers: Mutex<Vec<Dealer>>,
    messages: Mutex<Vec<Message>>,
    files: Mutex<Vec<FileUpload>>,
    sessions: Mutex<Vec<UserSession>>,
    preferences: Mutex<Vec<UserPreferences>>,
    logs: Mutex<Vec<ActivityLog>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            dealers: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            preferences: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Il set mock mostrato quando il portale gira senza backend:
    /// tre dealer, una breve conversazione e cinque file in stati diversi.
    pub fn seeded() -> Self {
        let store = Self::empty();
        let now = Utc::now();

        let demo_dealer = |id: Uuid,
                           name: &str,
                           email: &str,
                           company: Option<&str>,
                           role: DealerRole,
                           last_login: Option<DateTime<Utc>>| Dealer {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            company: company.map(str::to_string),
            role,
            status: DealerStatus::Active,
            is_active: true,
            profile_picture: None,
            notes: None,
            password_hash: String::new(), // demo logins skip verification
            created_at: now - Duration::days(30),
            registration_date: now - Duration::days(30),
            last_login,
            last_activity: last_login,
        };

        *store.dealers.lock().unwrap() = vec![
            demo_dealer(
                DEMO_ADMIN_ID,
                "Annemiek de Vries",
                "annemiek@dealerportaal.nl",
                None,
                DealerRole::Admin,
                Some(now - Duration::minutes(1)),
            ),
            demo_dealer(
                DEMO_DEALER_ID,
                "Jan Bakker",
                "jan@bakker-automotive.nl",
                Some("Bakker Automotive"),
                DealerRole::Dealer,
                Some(now - Duration::minutes(10)),
            ),
            demo_dealer(
                DEMO_MANAGER_ID,
                "Pieter van Dam",
                "pieter@vandam-trading.nl",
                Some("Van Dam Trading"),
                DealerRole::Manager,
                None,
            ),
        ];

        let demo_message = |sender: Uuid, receiver: Uuid, body: &str, sent_at, read| Message {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            body: body.to_string(),
            sent_at,
            read,
        };

        *store.messages.lock().unwrap() = vec![
            demo_message(
                DEMO_DEALER_ID,
                DEMO_ADMIN_ID,
                "Goedemorgen, is de nieuwe prijslijst al beschikbaar?",
                now - Duration::hours(2),
                true,
            ),
            demo_message(
                DEMO_ADMIN_ID,
                DEMO_DEALER_ID,
                "Die staat vanmiddag in het portaal.",
                now - Duration::hours(2) + Duration::minutes(4),
                true,
            ),
            demo_message(
                DEMO_DEALER_ID,
                DEMO_ADMIN_ID,
                "Top, dank!",
                now - Duration::hours(1),
                false,
            ),
        ];

        let demo_file = |owner: Uuid, filename: &str, folder: &str, status, age: Duration| {
            FileUpload {
                id: Uuid::new_v4(),
                dealer_id: owner,
                filename: filename.to_string(),
                folder: folder.to_string(),
                status,
                url: format!("/placeholder.svg?text={}", filename),
                created_at: now - age,
            }
        };

        *store.files.lock().unwrap() = vec![
            demo_file(
                DEMO_DEALER_ID,
                "product-catalog.pdf",
                "Marketing Materials",
                FileStatus::Approved,
                Duration::days(1),
            ),
            demo_file(
                DEMO_DEALER_ID,
                "price-list-2024.xlsx",
                "Price Lists",
                FileStatus::Pending,
                Duration::hours(12),
            ),
            demo_file(
                DEMO_MANAGER_ID,
                "technical-specs.pdf",
                "Documentation",
                FileStatus::Approved,
                Duration::hours(6),
            ),
            demo_file(
                DEMO_DEALER_ID,
                "installation-guide.pdf",
                "Documentation",
                FileStatus::Rejected,
                Duration::hours(3),
            ),
            demo_file(
                DEMO_ADMIN_ID,
                "warranty-info.pdf",
                "Legal",
                FileStatus::Pending,
                Duration::hours(2),
            ),
        ];

        store
    }

    fn is_between(msg: &Message, a: &Uuid, b: &Uuid) -> bool {
        (msg.sender_id == *a && msg.receiver_id == *b)
            || (msg.sender_id == *b && msg.receiver_id == *a)
    }
}

#[async_trait]
impl DealerStore for MemoryStore {
    async fn list(&self, include_inactive: bool) -> Result<Vec<Dealer>, Error> {
        let mut dealers: Vec<Dealer> = self
            .dealers
            .lock()
            .unwrap()
            .iter()
            .filter(|d| include_inactive || d.is_active)
            .cloned()
            .collect();
        dealers.sort_by(|a, b| b.registration_date.cmp(&a.registration_date));
        Ok(dealers)
    }

    async fn read(&self, id: &Uuid) -> Result<Option<Dealer>, Error> {
        Ok(self
            .dealers
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == *id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Dealer>, Error> {
        Ok(self
            .dealers
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn search(&self, term: &str) -> Result<Vec<Dealer>, Error> {
        let needle = term.to_lowercase();
        let matches = |field: &str| field.to_lowercase().contains(&needle);

        let mut dealers: Vec<Dealer> = self
            .dealers
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.is_active
                    && (matches(&d.name)
                        || matches(&d.email)
                        || d.company.as_deref().map(matches).unwrap_or(false))
            })
            .cloned()
            .collect();
        dealers.sort_by(|a, b| a.name.cmp(&b.name));
        dealers.truncate(20);
        Ok(dealers)
    }

    async fn create(&self, data: &CreateDealerDTO) -> Result<Dealer, Error> {
        let now = Utc::now();
        let dealer = Dealer {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            company: data.company.clone(),
            role: data.role,
            status: DealerStatus::Active,
            is_active: true,
            profile_picture: data.profile_picture.clone(),
            notes: data.notes.clone(),
            password_hash: data.password.clone(),
            created_at: now,
            registration_date: now,
            last_login: None,
            last_activity: None,
        };
        self.dealers.lock().unwrap().push(dealer.clone());
        Ok(dealer)
    }

    async fn update(&self, id: &Uuid, data: &UpdateDealerDTO) -> Result<Dealer, Error> {
        let mut dealers = self.dealers.lock().unwrap();
        let dealer = dealers
            .iter_mut()
            .find(|d| d.id == *id)
            .ok_or(Error::RowNotFound)?;

        if let Some(name) = &data.name {
            dealer.name = name.clone();
        }
        if let Some(email) = &data.email {
            dealer.email = email.clone();
        }
        if let Some(phone) = &data.phone {
            dealer.phone = Some(phone.clone());
        }
        if let Some(company) = &data.company {
            dealer.company = Some(company.clone());
        }
        if let Some(role) = data.role {
            dealer.role = role;
        }
        if let Some(picture) = &data.profile_picture {
            dealer.profile_picture = Some(picture.clone());
        }
        if let Some(notes) = &data.notes {
            dealer.notes = Some(notes.clone());
        }
        if let Some(status) = data.status {
            dealer.status = status;
        }
        if let Some(is_active) = data.is_active {
            dealer.is_active = is_active;
        }

        Ok(dealer.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), Error> {
        self.dealers.lock().unwrap().retain(|d| d.id != *id);
        Ok(())
    }

    async fn online_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Dealer>, Error> {
        let mut dealers: Vec<Dealer> = self
            .dealers
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.status == DealerStatus::Active
                    && d.last_login.map(|t| t > cutoff).unwrap_or(false)
            })
            .cloned()
            .collect();
        dealers.sort_by(|a, b| b.last_login.cmp(&a.last_login));
        Ok(dealers)
    }

    async fn touch_last_login(&self, id: &Uuid) -> Result<(), Error> {
        let now = Utc::now();
        if let Some(dealer) = self.dealers.lock().unwrap().iter_mut().find(|d| d.id == *id) {
            dealer.last_login = Some(now);
            dealer.last_activity = Some(now);
        }
        Ok(())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<DealerStatsDTO, Error> {
        let one_week_ago = now - Duration::days(7);
        let online_cutoff = now - Duration::seconds(ONLINE_WINDOW_SECS);
        let dealers = self.dealers.lock().unwrap();

        Ok(DealerStatsDTO {
            total: dealers.len() as i64,
            active: dealers.iter().filter(|d| d.is_active).count() as i64,
            inactive: dealers.iter().filter(|d| !d.is_active).count() as i64,
            new_this_week: dealers
                .iter()
                .filter(|d| d.registration_date >= one_week_ago)
                .count() as i64,
            online_now: dealers
                .iter()
                .filter(|d| d.last_login.map(|t| t > online_cutoff).unwrap_or(false))
                .count() as i64,
        })
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn conversation(&self, a: &Uuid, b: &Uuid) -> Result<Vec<Message>, Error> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| Self::is_between(m, a, b))
            .cloned()
            .collect();
        messages.sort_by(|x, y| x.sent_at.cmp(&y.sent_at));
        Ok(messages)
    }

    async fn create(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: data.sender_id,
            receiver_id: data.receiver_id,
            body: data.body.clone(),
            sent_at: data.sent_at,
            read: false,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, receiver_id: &Uuid, ids: &[Uuid]) -> Result<u64, Error> {
        let mut touched = 0;
        for message in self.messages.lock().unwrap().iter_mut() {
            if message.receiver_id == *receiver_id && ids.contains(&message.id) && !message.read {
                message.read = true;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, Error> {
        let mut touched = 0;
        for message in self.messages.lock().unwrap().iter_mut() {
            if message.receiver_id == *receiver_id
                && message.sender_id == *sender_id
                && !message.read
            {
                message.read = true;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn unread_count(&self, receiver_id: &Uuid, sender_id: &Uuid) -> Result<i64, Error> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.receiver_id == *receiver_id && m.sender_id == *sender_id && !m.read)
            .count() as i64)
    }

    async fn last_message(&self, a: &Uuid, b: &Uuid) -> Result<Option<Message>, Error> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| Self::is_between(m, a, b))
            .max_by_key(|m| m.sent_at)
            .cloned())
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<FileUpload>, Error> {
        let mut files: Vec<FileUpload> = self.files.lock().unwrap().clone();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_by_owner(&self, dealer_id: &Uuid) -> Result<Vec<FileUpload>, Error> {
        let mut files: Vec<FileUpload> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.dealer_id == *dealer_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_approved(&self) -> Result<Vec<FileUpload>, Error> {
        let mut files: Vec<FileUpload> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.status == FileStatus::Approved)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn read(&self, id: &Uuid) -> Result<Option<FileUpload>, Error> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == *id)
            .cloned())
    }

    async fn create(&self, data: &CreateFileDTO) -> Result<FileUpload, Error> {
        let file = FileUpload {
            id: Uuid::new_v4(),
            dealer_id: data.dealer_id,
            filename: data.filename.clone(),
            folder: data.folder.clone(),
            status: FileStatus::Pending,
            url: data.url.clone(),
            created_at: Utc::now(),
        };
        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn update_status(&self, id: &Uuid, status: FileStatus) -> Result<FileUpload, Error> {
        let mut files = self.files.lock().unwrap();
        let file = files
            .iter_mut()
            .find(|f| f.id == *id)
            .ok_or(Error::RowNotFound)?;
        file.status = status;
        Ok(file.clone())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn open(&self, data: &CreateSessionDTO) -> Result<UserSession, Error> {
        self.close_for_dealer(&data.dealer_id).await?;

        let session = UserSession {
            id: Uuid::new_v4(),
            dealer_id: data.dealer_id,
            session_start: Utc::now(),
            session_end: None,
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            is_active: true,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn close_for_dealer(&self, dealer_id: &Uuid) -> Result<(), Error> {
        let now = Utc::now();
        for session in self.sessions.lock().unwrap().iter_mut() {
            if session.dealer_id == *dealer_id && session.is_active {
                session.is_active = false;
                session.session_end = Some(now);
            }
        }
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<ActiveSessionRow>, Error> {
        let dealers = self.dealers.lock().unwrap();
        let mut rows: Vec<ActiveSessionRow> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active)
            .filter_map(|s| {
                dealers
                    .iter()
                    .find(|d| d.id == s.dealer_id)
                    .map(|d| ActiveSessionRow {
                        id: s.id,
                        dealer_id: s.dealer_id,
                        session_start: s.session_start,
                        ip_address: s.ip_address.clone(),
                        user_agent: s.user_agent.clone(),
                        dealer_name: d.name.clone(),
                        dealer_email: d.email.clone(),
                        dealer_profile_picture: d.profile_picture.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| b.session_start.cmp(&a.session_start));
        Ok(rows)
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn find_by_dealer(&self, dealer_id: &Uuid) -> Result<Option<UserPreferences>, Error> {
        Ok(self
            .preferences
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.dealer_id == *dealer_id)
            .cloned())
    }

    async fn create_default(&self, dealer_id: &Uuid) -> Result<UserPreferences, Error> {
        let mut preferences = self.preferences.lock().unwrap();
        if let Some(existing) = preferences.iter().find(|p| p.dealer_id == *dealer_id) {
            return Ok(existing.clone());
        }
        let defaults = UserPreferences::defaults(*dealer_id, Utc::now());
        preferences.push(defaults.clone());
        Ok(defaults)
    }

    async fn update(
        &self,
        dealer_id: &Uuid,
        data: &UpdatePreferencesDTO,
    ) -> Result<UserPreferences, Error> {
        let mut preferences = self.preferences.lock().unwrap();
        let prefs = preferences
            .iter_mut()
            .find(|p| p.dealer_id == *dealer_id)
            .ok_or(Error::RowNotFound)?;

        if let Some(language) = &data.language {
            prefs.language = language.clone();
        }
        if let Some(theme) = &data.theme {
            prefs.theme = theme.clone();
        }
        if let Some(enabled) = data.notifications_enabled {
            prefs.notifications_enabled = enabled;
        }
        if let Some(enabled) = data.email_notifications {
            prefs.email_notifications = enabled;
        }
        if let Some(enabled) = data.chat_notifications {
            prefs.chat_notifications = enabled;
        }
        prefs.updated_at = Utc::now();

        Ok(prefs.clone())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn record(
        &self,
        dealer_id: &Uuid,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), Error> {
        self.logs.lock().unwrap().push(ActivityLog {
            id: Uuid::new_v4(),
            dealer_id: *dealer_id,
            action: action.to_string(),
            details: if details.is_null() { json!({}) } else { details },
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(
        store: &MemoryStore,
        sender: Uuid,
        receiver: Uuid,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Message {
        MessageStore::create(
            store,
            &CreateMessageDTO {
                sender_id: sender,
                receiver_id: receiver,
                body: body.to_string(),
                sent_at,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn mark_read_touches_only_the_requested_ids() {
        let store = MemoryStore::empty();
        let now = Utc::now();
        let first = send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "one", now).await;
        let second = send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "two", now).await;
        let third = send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "three", now).await;

        let touched = store
            .mark_read(&DEMO_ADMIN_ID, &[first.id, third.id])
            .await
            .unwrap();
        assert_eq!(touched, 2);

        let history = store
            .conversation(&DEMO_ADMIN_ID, &DEMO_DEALER_ID)
            .await
            .unwrap();
        let read_state: Vec<bool> = history.iter().map(|m| m.read).collect();
        assert_eq!(history.len(), 3);
        assert!(history.iter().find(|m| m.id == second.id).is_some_and(|m| !m.read));
        assert_eq!(read_state.iter().filter(|r| **r).count(), 2);
    }

    #[tokio::test]
    async fn mark_read_ignores_messages_addressed_to_someone_else() {
        let store = MemoryStore::empty();
        let msg = send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "hoi", Utc::now()).await;

        // the manager tries to mark a message that was never sent to them
        let touched = store.mark_read(&DEMO_MANAGER_ID, &[msg.id]).await.unwrap();
        assert_eq!(touched, 0);

        let unread = store
            .unread_count(&DEMO_ADMIN_ID, &DEMO_DEALER_ID)
            .await
            .unwrap();
        assert_eq!(unread, 1);
    }

    #[tokio::test]
    async fn conversation_is_ordered_oldest_first() {
        let store = MemoryStore::empty();
        let now = Utc::now();
        send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "late", now).await;
        send(&store, DEMO_ADMIN_ID, DEMO_DEALER_ID, "early", now - Duration::hours(1)).await;

        let history = store
            .conversation(&DEMO_ADMIN_ID, &DEMO_DEALER_ID)
            .await
            .unwrap();
        assert_eq!(history[0].body, "early");
        assert_eq!(history[1].body, "late");
    }

    #[tokio::test]
    async fn last_message_picks_the_most_recent_in_either_direction() {
        let store = MemoryStore::empty();
        let now = Utc::now();
        send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "first", now - Duration::minutes(5)).await;
        send(&store, DEMO_ADMIN_ID, DEMO_DEALER_ID, "reply", now).await;

        let last = store
            .last_message(&DEMO_DEALER_ID, &DEMO_ADMIN_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(last.body, "reply");
    }

    #[tokio::test]
    async fn mark_conversation_read_clears_the_unread_count() {
        let store = MemoryStore::empty();
        let now = Utc::now();
        send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "a", now).await;
        send(&store, DEMO_DEALER_ID, DEMO_ADMIN_ID, "b", now).await;
        // unrelated direction stays untouched
        send(&store, DEMO_ADMIN_ID, DEMO_DEALER_ID, "c", now).await;

        store
            .mark_conversation_read(&DEMO_ADMIN_ID, &DEMO_DEALER_ID)
            .await
            .unwrap();

        assert_eq!(
            store
                .unread_count(&DEMO_ADMIN_ID, &DEMO_DEALER_ID)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .unread_count(&DEMO_DEALER_ID, &DEMO_ADMIN_ID)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn seeded_store_carries_the_demo_set() {
        let store = MemoryStore::seeded();
        assert_eq!(store.list(true).await.unwrap().len(), 3);
        assert_eq!(store.list_all().await.unwrap().len(), 5);
        assert_eq!(store.list_approved().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn file_status_can_be_updated() {
        let store = MemoryStore::seeded();
        let pending = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .find(|f| f.status == FileStatus::Pending)
            .unwrap();

        let updated = store
            .update_status(&pending.id, FileStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.status, FileStatus::Approved);
        assert_eq!(store.list_approved().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stats_reflect_presence_window_and_registrations() {
        let store = MemoryStore::seeded();
        let stats = DealerStore::stats(&store, Utc::now()).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.inactive, 0);
        assert_eq!(stats.new_this_week, 0);
        // only the admin logged in within the five-minute window
        assert_eq!(stats.online_now, 1);
    }

    #[tokio::test]
    async fn opening_a_session_closes_the_previous_one() {
        let store = MemoryStore::seeded();
        let open = |_| CreateSessionDTO {
            dealer_id: DEMO_DEALER_ID,
            ip_address: None,
            user_agent: None,
        };

        store.open(&open(0)).await.unwrap();
        store.open(&open(1)).await.unwrap();

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].dealer_name, "Jan Bakker");
    }
}
