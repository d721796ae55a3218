//! Session context.
//!
//! The logged-in state is an explicit [`Session`] value handed to whoever
//! needs it. [`SessionManager`] owns its lifecycle: `init` reads the persisted
//! token, `establish` persists a new one, and `teardown` clears it.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::SessionError;
use crate::ports::SessionStore;

/// The session attached to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
    token: Option<String>,
}

impl Session {
    /// A visitor without a session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Backend bearer token, present only when logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Creates, restores and ends sessions against a [`SessionStore`].
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Option<Duration>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Option<Duration>) -> Self {
        Self { store, ttl }
    }

    /// Restore the session for `session_id`.
    ///
    /// Unknown or expired ids give an anonymous session that still carries the
    /// id, so the caller can tell the browser to forget it.
    pub async fn init(&self, session_id: Option<&str>) -> Result<Session, SessionError> {
        let Some(id) = session_id.filter(|id| !id.is_empty()) else {
            return Ok(Session::anonymous());
        };

        let token = self.store.load(id).await?;

        Ok(Session {
            id: Some(id.to_string()),
            token,
        })
    }

    /// Persist `token` under a fresh session id.
    pub async fn establish(&self, token: impl Into<String>) -> Result<Session, SessionError> {
        let id = Uuid::new_v4().to_string();
        let token = token.into();

        self.store.save(&id, &token, self.ttl).await?;

        Ok(Session {
            id: Some(id),
            token: Some(token),
        })
    }

    /// Clear whatever the session persisted. Safe to call on any session.
    pub async fn teardown(&self, session: &Session) -> Result<(), SessionError> {
        match session.id() {
            Some(id) => self.store.clear(id).await,
            None => Ok(()),
        }
    }
}
