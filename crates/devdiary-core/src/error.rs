//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: &'static str, key: String },

    #[error("Unauthorized access")]
    Unauthorized,
}

/// Failure returned by a backend gateway call.
///
/// The backend reports failures as `{ "message": "..." }` bodies; the status
/// and that message are kept together so callers can branch on the status
/// without parsing text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Api { status, .. } => match status {
                401 => "unauthorized",
                403 => "forbidden",
                404 => "not_found",
                400 | 422 => "bad_request",
                409 => "conflict",
                _ => "backend_error",
            },
            GatewayError::Transport(_) => "transport",
            GatewayError::Decode(_) => "decode",
        }
    }

    /// HTTP status reported by the backend, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store unavailable: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_codes() {
        assert_eq!(GatewayError::api(401, "nope").code(), "unauthorized");
        assert_eq!(GatewayError::api(422, "bad").code(), "bad_request");
        assert_eq!(GatewayError::api(503, "down").code(), "backend_error");
        assert_eq!(GatewayError::Transport("refused".into()).code(), "transport");
    }

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = GatewayError::api(404, "Post not found");
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }
}
