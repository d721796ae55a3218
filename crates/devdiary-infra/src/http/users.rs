use async_trait::async_trait;
use reqwest::Method;

use devdiary_core::GatewayError;
use devdiary_core::domain::{Credentials, Registration, User};
use devdiary_core::ports::UserGateway;
use devdiary_shared::dto::{LoginRequest, RegisterRequest, TokenEnvelope, UserEnvelope};

use super::BackendClient;

/// [`UserGateway`] backed by the blog API's `/users` endpoints.
pub struct HttpUserGateway {
    client: BackendClient,
}

impl HttpUserGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserGateway for HttpUserGateway {
    async fn login(&self, credentials: &Credentials) -> Result<String, GatewayError> {
        let request = self
            .client
            .request(Method::POST, &["users", "login"], None)?
            .json(&LoginRequest::from(credentials));

        let envelope: TokenEnvelope = self.client.send(request).await?;
        Ok(envelope.token)
    }

    async fn register(&self, registration: &Registration) -> Result<String, GatewayError> {
        let request = self
            .client
            .request(Method::POST, &["users", "register"], None)?
            .json(&RegisterRequest::from(registration));

        let envelope: TokenEnvelope = self.client.send(request).await?;
        Ok(envelope.token)
    }

    async fn profile(&self, token: &str) -> Result<User, GatewayError> {
        let request = self
            .client
            .request(Method::GET, &["users", "profile"], Some(token))?;

        let envelope: UserEnvelope = self.client.send(request).await?;
        Ok(envelope.user)
    }
}
