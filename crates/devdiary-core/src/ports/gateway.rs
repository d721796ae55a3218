//! Backend gateway ports.

use async_trait::async_trait;

use crate::domain::{Credentials, NewPost, Post, PostChanges, Registration, User};
use crate::error::GatewayError;

/// Access to posts held by the external blog backend.
///
/// Methods taking a `token` act on behalf of the logged-in author; the rest
/// are public and only ever see published posts.
#[async_trait]
pub trait PostGateway: Send + Sync {
    async fn create(&self, token: &str, post: &NewPost) -> Result<Post, GatewayError>;

    async fn get(&self, token: &str, id: &str) -> Result<Post, GatewayError>;

    /// Every post owned by the token's author, drafts included.
    async fn list(&self, token: &str) -> Result<Vec<Post>, GatewayError>;

    async fn update(
        &self,
        token: &str,
        id: &str,
        changes: &PostChanges,
    ) -> Result<Post, GatewayError>;

    async fn delete(&self, token: &str, id: &str) -> Result<(), GatewayError>;

    async fn get_by_handle(&self, handle: &str) -> Result<Post, GatewayError>;

    async fn list_published(&self) -> Result<Vec<Post>, GatewayError>;

    /// Backend-side full-text search over published posts.
    async fn search(&self, query: &str) -> Result<Vec<Post>, GatewayError>;
}

/// Account operations on the external blog backend.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, GatewayError>;

    /// Create an account and return its bearer token.
    async fn register(&self, registration: &Registration) -> Result<String, GatewayError>;

    async fn profile(&self, token: &str) -> Result<User, GatewayError>;

    /// Revoke `token`. Backends with stateless tokens have nothing to revoke.
    async fn logout(&self, _token: &str) -> Result<(), GatewayError> {
        Ok(())
    }
}
