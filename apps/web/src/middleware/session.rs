//! Session extractors and cookie helpers.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use devdiary_core::{DomainError, Session};

use crate::config::SessionConfig;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// The caller's session, logged in or not.
///
/// Restoring it reads the persisted token for the session cookie:
/// ```ignore
/// async fn handler(CurrentSession(session): CurrentSession) -> impl Responder {
///     format!("logged in: {}", session.is_logged_in())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequest for CurrentSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let session_id = state.as_ref().and_then(|state| {
            req.cookie(&state.session_config.cookie_name)
                .map(|c| c.value().to_string())
        });

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let session = state.sessions.init(session_id.as_deref()).await?;
            Ok(CurrentSession(session))
        })
    }
}

/// A session that must be logged in. Protected routes take this.
#[derive(Debug, Clone)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Backend bearer token.
    pub fn token(&self) -> &str {
        self.session.token().unwrap_or_default()
    }
}

impl FromRequest for AuthSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let config = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.session_config.clone());
        let current = CurrentSession::from_request(req, payload);

        Box::pin(async move {
            let CurrentSession(session) = current.await?;
            if session.is_logged_in() {
                return Ok(AuthSession { session });
            }

            // A cookie without a live session behind it is dropped.
            match (session.id(), config) {
                (Some(_), Some(config)) => Err(AppError::SessionEnded(expired_cookie(&config))),
                _ => Err(DomainError::Unauthorized.into()),
            }
        })
    }
}

/// Cookie carrying the session id.
pub fn session_cookie(config: &SessionConfig, session: &Session) -> Cookie<'static> {
    let max_age = CookieDuration::seconds(i64::try_from(config.ttl.as_secs()).unwrap_or(i64::MAX));

    Cookie::build(
        config.cookie_name.clone(),
        session.id().unwrap_or_default().to_string(),
    )
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.secure)
    .max_age(max_age)
    .finish()
}

/// Cookie that makes the browser forget its session.
pub fn expired_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig {
            cookie_name: "sid".to_string(),
            ttl: Duration::from_secs(3600),
            secure: true,
        };
        let session = Session::anonymous();

        let cookie = session_cookie(&config, &session);

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));
    }

    #[test]
    fn test_expired_cookie_is_removal() {
        let cookie = expired_cookie(&SessionConfig::default());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
