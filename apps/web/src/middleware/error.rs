//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, cookie::Cookie, http::StatusCode};
use devdiary_core::{DomainError, FieldErrors, GatewayError, SessionError};
use devdiary_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    /// The session cookie names a session that no longer exists. Carries the
    /// cookie that makes the browser forget it.
    SessionEnded(Cookie<'static>),
    Forbidden,
    Conflict(String),
    BadGateway(String),
    Internal(String),
    Validation(FieldErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::SessionEnded(_) => write!(f, "Session ended"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::SessionEnded(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please log in to continue."),
            AppError::SessionEnded(removal) => {
                response.cookie(removal.clone());
                ErrorResponse::new(401, "Authentication Required")
                    .with_detail("Your session has expired. Please log in again.")
            }
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::BadGateway(detail) => ErrorResponse::bad_gateway(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_detail(errors.to_string())
                .with_errors(errors.clone().into_map()),
        };

        response.json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Unauthorized => AppError::Unauthorized,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Api { status, message } => match status {
                401 => AppError::Unauthorized,
                403 => AppError::Forbidden,
                404 => AppError::NotFound(message),
                400 | 422 => AppError::BadRequest(message),
                409 => AppError::Conflict(message),
                _ => {
                    tracing::error!(status, "Backend error: {}", message);
                    AppError::BadGateway(message)
                }
            },
            GatewayError::Transport(msg) | GatewayError::Decode(msg) => {
                tracing::error!("Backend unavailable: {}", msg);
                AppError::BadGateway(
                    "The blog service is unavailable. Try again later.".to_string(),
                )
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
