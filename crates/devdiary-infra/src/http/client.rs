//! Thin reqwest wrapper that turns every backend exchange into a `Result`.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use devdiary_core::GatewayError;
use devdiary_shared::dto::BackendMessage;

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the blog API, e.g. `https://api.example.com/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Failure to set the client up.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("Invalid backend URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// JSON client for the blog backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientBuildError> {
        let invalid = |reason: &str| ClientBuildError::InvalidUrl {
            url: config.base_url.clone(),
            reason: reason.to_string(),
        };

        let mut base_url = Url::parse(&config.base_url).map_err(|e| invalid(&e.to_string()))?;
        base_url
            .path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path"))?
            .pop_if_empty();

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve path segments against the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a `/` or `?` inside an
    /// id stays inside that segment. Dot and empty segments name no resource.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(GatewayError::api(404, format!("No resource at {bad:?}")));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("backend URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request to the endpoint named by `segments`, attaching the
    /// bearer token when given.
    pub fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder, GatewayError> {
        let builder = self.http.request(method, self.endpoint(segments)?);

        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send and decode a JSON body.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.dispatch(request).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Send and ignore whatever body comes back.
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), GatewayError> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Backend request failed");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<BackendMessage>().await.unwrap_or_default();
        let message = body.message.unwrap_or_else(|| fallback_message(status));

        tracing::warn!(status = status.as_u16(), message = %message, "Backend rejected request");

        Err(GatewayError::api(status.as_u16(), message))
    }
}

fn fallback_message(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}
