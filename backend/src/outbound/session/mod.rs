//! In-memory participant session store.
//!
//! Entries live in a `RwLock<HashMap>` keyed by session id and expire after a
//! period of inactivity measured with the injected [`Clock`]. Expired entries
//! are dropped lazily on access and swept whenever a session is saved.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{GameSessionStore, GameSessionStoreError};
use crate::domain::{ParticipantSession, SessionId};

/// Default inactivity window before a session is forgotten.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    touched_at: DateTime<Utc>,
    session: ParticipantSession,
}

/// In-process [`GameSessionStore`] adapter.
pub struct InMemoryGameSessionStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl InMemoryGameSessionStore {
    /// Create a store whose entries expire after `ttl` without access.
    ///
    /// TTLs beyond the range of [`TimeDelta`] are clamped to its maximum.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Number of stored entries, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.touched_at) >= self.ttl
    }

    fn poisoned() -> GameSessionStoreError {
        GameSessionStoreError::query("session map lock poisoned")
    }
}

#[async_trait]
impl GameSessionStore for InMemoryGameSessionStore {
    async fn load(
        &self,
        id: &SessionId,
    ) -> Result<Option<ParticipantSession>, GameSessionStoreError> {
        let now = self.clock.utc();
        let mut map = self.entries.write().map_err(|_| Self::poisoned())?;
        let Some(entry) = map.get_mut(id) else {
            return Ok(None);
        };
        if self.expired(entry, now) {
            map.remove(id);
            debug!(session_id = %id, "session expired");
            return Ok(None);
        }
        entry.touched_at = now;
        Ok(Some(entry.session.clone()))
    }

    async fn save(
        &self,
        id: &SessionId,
        session: ParticipantSession,
    ) -> Result<(), GameSessionStoreError> {
        let now = self.clock.utc();
        let mut map = self.entries.write().map_err(|_| Self::poisoned())?;
        let before = map.len();
        map.retain(|_, entry| now.signed_duration_since(entry.touched_at) < self.ttl);
        let swept = before - map.len();
        if swept > 0 {
            debug!(swept, "expired sessions swept");
        }
        map.insert(
            *id,
            Entry {
                touched_at: now,
                session,
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), GameSessionStoreError> {
        self.entries
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(id);
        Ok(())
    }
}
