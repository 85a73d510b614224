//! In-memory session store. Sessions expire a fixed time after creation or
//! when deleted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feed::state::FeedState;
use crate::models::profile::UserProfile;
use crate::onboarding::flow::{Navigator, Screen};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub navigator: Navigator,
    pub profile: UserProfile,
    pub feed: FeedState,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            navigator: Navigator::default(),
            profile: UserProfile::default(),
            feed: FeedState::default(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            screen: self.navigator.screen(),
            onboarded: self.navigator.onboarded(),
            selected_opportunity: self.navigator.selected().map(str::to_string),
            profile: self.profile.clone(),
            saved: self.feed.saved_ids(),
            applied: self.feed.applied_ids().to_vec(),
        }
    }

    fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        (now - self.created_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub screen: Screen,
    pub onboarded: bool,
    pub selected_opportunity: Option<String>,
    pub profile: UserProfile,
    pub saved: Vec<String>,
    pub applied: Vec<String>,
}

/// Without a TTL (`Default`) sessions never expire.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl: Some(ttl),
        }
    }

    /// Creates a session, dropping every expired one first.
    pub async fn create(&self) -> SessionSnapshot {
        let session = Session::new();
        let snapshot = session.snapshot();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {pruned} expired session(s)");
        }
        sessions.insert(session.id, session);

        info!("Session {} created", snapshot.id);
        snapshot
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(not_found(id));
        }
        info!("Session {id} deleted");
        Ok(())
    }

    /// Runs `f` against a read-only view of the session.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Result<T, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl, Utc::now()))
            .ok_or_else(|| not_found(id))?;
        Ok(f(session))
    }

    /// Runs a fallible mutation under the write lock. A failed mutation must
    /// leave the session untouched.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        let session = sessions
            .get_mut(&id)
            .filter(|s| !s.is_expired(self.ttl, now))
            .ok_or_else(|| not_found(id))?;
        f(session)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
