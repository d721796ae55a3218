use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;

/// Session store - persists the backend token behind an opaque session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the token stored for a session, if it exists and has not expired.
    async fn load(&self, session_id: &str) -> Result<Option<String>, SessionError>;

    /// Store a token for a session with an optional TTL.
    async fn save(
        &self,
        session_id: &str,
        token: &str,
        ttl: Option<Duration>,
    ) -> Result<(), SessionError>;

    /// Forget a session. Clearing an unknown session is not an error.
    async fn clear(&self, session_id: &str) -> Result<(), SessionError>;
}
