use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::{Query, State};
use axum::{debug_handler, Json};
use party_core::party_state::{NewSessionResponse, PartyState, PartyView, SessionQuery};
use party_core::shared_wheel_game::ExemptRule;
use rand::rngs::OsRng;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::Error;
use crate::AppState;

pub struct PartySession {
    pub party: PartyState,
    pub last_seen: u64,
}

/// Ephemeral in-memory sessions. Every request runs one transition under the lock.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, PartySession>>>,
    expiry: Duration,
}

impl SessionStore {
    pub fn new(expiry: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            expiry,
        }
    }

    /// Stores a new session and drops the ones idle past the expiry.
    pub async fn create(&self, party: PartyState) -> String {
        let mut sessions = self.sessions.lock().await;
        let now = now_secs();
        let expiry = self.expiry.as_secs();
        let before = sessions.len();
        sessions.retain(|_, session| now.saturating_sub(session.last_seen) < expiry);
        if sessions.len() < before {
            info!("Evicted {} idle sessions", before - sessions.len());
        }

        let session_id = Uuid::new_v4().to_string();
        sessions.insert(
            session_id.clone(),
            PartySession {
                party,
                last_seen: now,
            },
        );
        session_id
    }

    pub async fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut PartyState) -> T,
    ) -> Result<T, Error> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id).ok_or(Error::SessionNotFound)?;
        session.last_seen = now_secs();
        Ok(f(&mut session.party))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Animation seed for views with no spin of their own to replay. Never used for the draw.
pub fn animation_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[debug_handler]
pub async fn create_session(State(state): State<AppState>) -> Json<NewSessionResponse> {
    let mut party = PartyState::new(
        state.config.reward_pool_size,
        ExemptRule::new(state.config.exempt_player.clone()),
    );
    let view = party.view(&mut OsRng, animation_seed());
    let session_id = state.sessions.create(party).await;
    info!("🎉 New party session {}", session_id);
    Json(NewSessionResponse { session_id, view })
}

#[debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<PartyView>, Error> {
    let seed = animation_seed();
    let view = state
        .sessions
        .with_session(&query.session_id, |party| party.view(&mut OsRng, seed))
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> PartyState {
        PartyState::new(3, ExemptRule::default())
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let result = store.with_session("missing", |_| ()).await;
        assert!(matches!(result, Err(Error::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_state_persists_between_calls() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create(party()).await;
        store
            .with_session(&id, |party| party.reward.set_remove_after(true))
            .await
            .unwrap();
        let enabled = store.with_session(&id, |party| party.reward.remove_after).await.unwrap();
        assert!(enabled);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::from_secs(0));
        store.create(party()).await;
        store.create(party()).await;
        assert_eq!(store.len().await, 1);
    }
}
