//! Port for server-side participant session storage.

use async_trait::async_trait;

use crate::domain::{ParticipantSession, SessionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum GameSessionStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "session store connection failed: {message}",
        /// Reading or writing an entry failed.
        Query { message: String } => "session store query failed: {message}",
    }
}

/// Keyed storage of participant sessions with inactivity expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameSessionStore: Send + Sync {
    /// Fetch a live session. Expired entries read as `None`.
    async fn load(&self, id: &SessionId)
    -> Result<Option<ParticipantSession>, GameSessionStoreError>;

    /// Insert or replace a session and refresh its expiry.
    async fn save(
        &self,
        id: &SessionId,
        session: ParticipantSession,
    ) -> Result<(), GameSessionStoreError>;

    /// Drop a session. Missing entries are ignored.
    async fn remove(&self, id: &SessionId) -> Result<(), GameSessionStoreError>;
}
