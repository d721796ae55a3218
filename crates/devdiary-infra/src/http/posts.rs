use async_trait::async_trait;
use reqwest::Method;

use devdiary_core::GatewayError;
use devdiary_core::domain::{NewPost, Post, PostChanges};
use devdiary_core::ports::PostGateway;
use devdiary_shared::dto::{CreatePostRequest, PostEnvelope, PostListEnvelope, UpdatePostRequest};

use super::BackendClient;

/// [`PostGateway`] backed by the blog API's `/posts` endpoints.
pub struct HttpPostGateway {
    client: BackendClient,
}

impl HttpPostGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostGateway for HttpPostGateway {
    async fn create(&self, token: &str, post: &NewPost) -> Result<Post, GatewayError> {
        let request = self
            .client
            .request(Method::POST, &["posts"], Some(token))?
            .json(&CreatePostRequest::from(post));

        let envelope: PostEnvelope = self.client.send(request).await?;
        tracing::info!(post_id = %envelope.post.id, "Post created");
        Ok(envelope.post)
    }

    async fn get(&self, token: &str, id: &str) -> Result<Post, GatewayError> {
        let request = self
            .client
            .request(Method::GET, &["posts", id], Some(token))?;

        let envelope: PostEnvelope = self.client.send(request).await?;
        Ok(envelope.post)
    }

    async fn list(&self, token: &str) -> Result<Vec<Post>, GatewayError> {
        let request = self.client.request(Method::GET, &["posts"], Some(token))?;

        let envelope: PostListEnvelope = self.client.send(request).await?;
        Ok(envelope.posts)
    }

    async fn update(
        &self,
        token: &str,
        id: &str,
        changes: &PostChanges,
    ) -> Result<Post, GatewayError> {
        let request = self
            .client
            .request(Method::PUT, &["posts", id], Some(token))?
            .json(&UpdatePostRequest::new(id, changes));

        let envelope: PostEnvelope = self.client.send(request).await?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(envelope.post)
    }

    async fn delete(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .request(Method::DELETE, &["posts", id], Some(token))?;

        self.client.send_empty(request).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn get_by_handle(&self, handle: &str) -> Result<Post, GatewayError> {
        let request = self
            .client
            .request(Method::GET, &["posts", "public", handle], None)?;

        let envelope: PostEnvelope = self.client.send(request).await?;
        Ok(envelope.post)
    }

    async fn list_published(&self) -> Result<Vec<Post>, GatewayError> {
        let request = self.client.request(Method::GET, &["posts", "public"], None)?;

        let envelope: PostListEnvelope = self.client.send(request).await?;
        Ok(envelope.posts)
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, GatewayError> {
        let request = self
            .client
            .request(Method::GET, &["posts", "search"], None)?
            .query(&[("q", query)]);

        let envelope: PostListEnvelope = self.client.send(request).await?;
        Ok(envelope.posts)
    }
}
