//! In-memory session store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use devdiary_core::SessionError;
use devdiary_core::ports::SessionStore;

struct SessionEntry {
    token: String,
    expires_at: Option<Instant>,
}

impl SessionEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() > exp)
            .unwrap_or(false)
    }
}

/// Session store using a HashMap behind an async RwLock.
///
/// Note: sessions are lost on process restart, which logs everybody out.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<String>, SessionError> {
        let sessions = self.sessions.read().await;
        let Some(entry) = sessions.get(session_id) else {
            return Ok(None);
        };

        if entry.is_expired() {
            drop(sessions);
            // Drop the expired entry under the write lock
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id);
            tracing::debug!("Session expired");
            return Ok(None);
        }

        Ok(Some(entry.token.clone()))
    }

    async fn save(
        &self,
        session_id: &str,
        token: &str,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;

        // Abandoned sessions are never loaded again, so sweep them here.
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired());
        if sessions.len() < before {
            tracing::debug!(swept = before - sessions.len(), "Expired sessions removed");
        }

        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                token: token.to_string(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );

        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
