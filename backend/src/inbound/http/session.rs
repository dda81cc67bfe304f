//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie only carries an opaque [`SessionId`]; participant details and
//! game progress live in the server-side session store.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionId};

/// Cookie name used by the session middleware.
pub const SESSION_COOKIE_NAME: &str = "session";

pub(crate) const SESSION_ID_KEY: &str = "session_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Attach `id` to the cookie, renewing the cookie so a previous
    /// participant's cookie cannot be replayed against the new session.
    pub fn bind(&self, id: &SessionId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(SESSION_ID_KEY, id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the cookie contents.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Session id carried by the cookie, if any.
    ///
    /// A value that does not parse is logged and treated as absent.
    pub fn session_id(&self) -> Result<Option<SessionId>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match value.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid session id in cookie");
                None
            }
        }))
    }

    /// Require a participant session or return `404 Not Found`.
    pub fn require_session_id(&self) -> Result<SessionId, Error> {
        self.session_id()?.ok_or_else(|| {
            Error::not_found("no participant session; submit the start form first")
        })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
