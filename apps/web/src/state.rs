//! Application state - shared across all handlers.

use std::sync::Arc;

use devdiary_core::SessionManager;
use devdiary_core::ports::{PostGateway, SessionStore, UserGateway};
use devdiary_infra::{
    BackendClient, ClientBuildError, HttpPostGateway, HttpUserGateway, InMemoryBackend,
    InMemorySessionStore,
};

use crate::config::{AppConfig, SessionConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostGateway>,
    pub users: Arc<dyn UserGateway>,
    pub sessions: Arc<SessionManager>,
    pub session_config: SessionConfig,
    /// `"http"` or `"memory"`, reported by the health check.
    pub backend_mode: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Result<Self, ClientBuildError> {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

        let state = match &config.backend {
            Some(backend) => {
                let client = BackendClient::new(backend)?;
                tracing::info!(base_url = %client.base_url(), "Using blog backend");

                Self::from_parts(
                    Arc::new(HttpPostGateway::new(client.clone())),
                    Arc::new(HttpUserGateway::new(client)),
                    store,
                    config.session.clone(),
                    "http",
                )
            }
            None => {
                tracing::warn!("BACKEND_API_URL not set. Running against the in-memory backend.");
                Self::in_memory(Arc::new(InMemoryBackend::new()), store, config.session.clone())
            }
        };

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// State served entirely from one in-memory backend.
    pub fn in_memory(
        backend: Arc<InMemoryBackend>,
        store: Arc<dyn SessionStore>,
        session_config: SessionConfig,
    ) -> Self {
        Self::from_parts(backend.clone(), backend, store, session_config, "memory")
    }

    pub(crate) fn from_parts(
        posts: Arc<dyn PostGateway>,
        users: Arc<dyn UserGateway>,
        store: Arc<dyn SessionStore>,
        session_config: SessionConfig,
        backend_mode: &'static str,
    ) -> Self {
        let sessions = SessionManager::new(store, Some(session_config.ttl));

        Self {
            posts,
            users,
            sessions: Arc::new(sessions),
            session_config,
            backend_mode,
        }
    }
}
