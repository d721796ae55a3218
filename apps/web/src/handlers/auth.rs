//! Authentication handlers.

use actix_web::{HttpResponse, HttpResponseBuilder, web};

use devdiary_core::validation::{LoginInput, RegisterInput};
use devdiary_shared::ApiResponse;
use devdiary_shared::dto::{SessionView, UserView};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{AuthSession, CurrentSession, expired_cookie, session_cookie};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterInput>,
) -> AppResult<HttpResponse> {
    let registration = body.into_inner().into_registration()?;
    let token = state.users.register(&registration).await?;

    start_session(&state, token, HttpResponse::Created()).await
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginInput>,
) -> AppResult<HttpResponse> {
    let credentials = body.into_inner().into_credentials()?;
    let token = state.users.login(&credentials).await?;

    start_session(&state, token, HttpResponse::Ok()).await
}

/// Persist the token and answer with the profile it belongs to.
///
/// A token the backend will not serve a profile for is not kept.
async fn start_session(
    state: &AppState,
    token: String,
    mut response: HttpResponseBuilder,
) -> AppResult<HttpResponse> {
    let user = state.users.profile(&token).await?;
    let session = state.sessions.establish(token).await?;

    tracing::info!(user_id = %user.id, "Session started");

    Ok(response
        .cookie(session_cookie(&state.session_config, &session))
        .json(ApiResponse::ok(SessionView {
            logged_in: true,
            user: Some(UserView::from(user)),
        })))
}

/// POST /api/auth/logout
pub async fn logout(
    state: web::Data<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<HttpResponse> {
    if let Some(token) = session.token() {
        if let Err(err) = state.users.logout(token).await {
            tracing::warn!(error = %err, "Backend token revocation failed");
        }
    }
    state.sessions.teardown(&session).await?;

    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(&state.session_config))
        .json(ApiResponse::ok_with_message(
            SessionView {
                logged_in: false,
                user: None,
            },
            "Logged out",
        )))
}

/// GET /api/auth/me - Protected route
///
/// A token the backend no longer accepts ends the session.
pub async fn me(state: web::Data<AppState>, auth: AuthSession) -> AppResult<HttpResponse> {
    match state.users.profile(auth.token()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::ok(SessionView {
            logged_in: true,
            user: Some(UserView::from(user)),
        }))),
        Err(err) if err.is_unauthorized() => {
            tracing::info!("Backend rejected session token, logging out");
            state.sessions.teardown(auth.session()).await?;

            Err(AppError::SessionEnded(expired_cookie(&state.session_config)))
        }
        Err(err) => Err(err.into()),
    }
}
