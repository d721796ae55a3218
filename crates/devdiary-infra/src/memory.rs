//! In-memory blog backend - used when no backend URL is configured.
//!
//! Behaves like the real API closely enough for local development and
//! handler tests: accounts, bearer tokens, ownership checks, handles and
//! reading times. Data is lost on process restart.

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use devdiary_core::GatewayError;
use devdiary_core::domain::{
    Author, Credentials, NewPost, Post, PostChanges, PostStatus, Registration, User,
};
use devdiary_core::ports::{PostGateway, UserGateway};

const WORDS_PER_MINUTE: usize = 200;

struct Account {
    user: User,
    /// Argon2 PHC string.
    password_hash: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    tokens: HashMap<String, String>,
    posts: Vec<Post>,
}

impl State {
    fn user_for(&self, token: &str) -> Result<&User, GatewayError> {
        let user_id = self
            .tokens
            .get(token)
            .ok_or_else(|| GatewayError::api(401, "Not authorized, token failed"))?;

        self.accounts
            .iter()
            .map(|a| &a.user)
            .find(|u| &u.id == user_id)
            .ok_or_else(|| GatewayError::api(401, "Not authorized, token failed"))
    }

    fn owned_post_index(&self, token: &str, id: &str) -> Result<usize, GatewayError> {
        let user_id = self.user_for(token)?.id.clone();
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| GatewayError::api(404, "Post not found"))?;

        if self.posts[index].author.id != user_id {
            return Err(GatewayError::api(403, "Not authorized to modify this post"));
        }
        Ok(index)
    }

    fn issue_token(&mut self, user_id: &str) -> String {
        let token = format!("mem-{}", Uuid::new_v4());
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    fn unique_handle(&self, title: &str) -> String {
        let base = match slug::slugify(title) {
            s if s.is_empty() => "post".to_string(),
            s => s,
        };

        let mut handle = base.clone();
        let mut n = 2;
        while self.posts.iter().any(|p| p.handle == handle) {
            handle = format!("{base}-{n}");
            n += 1;
        }
        handle
    }
}

fn hash_password(password: &str) -> Result<String, GatewayError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            GatewayError::api(500, "Could not create account")
        })
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

fn invalid_credentials() -> GatewayError {
    GatewayError::api(401, "Invalid email or password")
}

/// Reading time in whole minutes, never less than one.
pub fn reading_time(content: &str) -> u32 {
    let words = devdiary_core::text::strip_tags(content)
        .split_whitespace()
        .count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Blog backend held entirely in memory.
#[derive(Default)]
pub struct InMemoryBackend {
    state: RwLock<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a post directly, bypassing validation and ownership.
    pub async fn insert_post(&self, post: Post) {
        self.state.write().await.posts.push(post);
    }
}

#[async_trait]
impl UserGateway for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<String, GatewayError> {
        let (user_id, password_hash) = {
            let state = self.state.read().await;
            state
                .accounts
                .iter()
                .find(|a| a.user.email.eq_ignore_ascii_case(&credentials.email))
                .map(|a| (a.user.id.clone(), a.password_hash.clone()))
                .ok_or_else(invalid_credentials)?
        };

        // Verified outside the lock; argon2 is deliberately slow.
        if !verify_password(&credentials.password, &password_hash) {
            return Err(invalid_credentials());
        }

        Ok(self.state.write().await.issue_token(&user_id))
    }

    async fn register(&self, registration: &Registration) -> Result<String, GatewayError> {
        let password_hash = hash_password(&registration.password)?;
        let mut state = self.state.write().await;

        if state
            .accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(&registration.email))
        {
            return Err(GatewayError::api(400, "User already exists"));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: registration.name.clone(),
            email: registration.email.clone(),
        };
        let user_id = user.id.clone();
        state.accounts.push(Account {
            user,
            password_hash,
        });

        tracing::info!(user_id = %user_id, "Account registered");
        Ok(state.issue_token(&user_id))
    }

    async fn profile(&self, token: &str) -> Result<User, GatewayError> {
        let state = self.state.read().await;
        state.user_for(token).cloned()
    }

    async fn logout(&self, token: &str) -> Result<(), GatewayError> {
        self.state.write().await.tokens.remove(token);
        Ok(())
    }
}

#[async_trait]
impl PostGateway for InMemoryBackend {
    async fn create(&self, token: &str, post: &NewPost) -> Result<Post, GatewayError> {
        let mut state = self.state.write().await;
        let user = state.user_for(token)?.clone();
        let now = Utc::now();

        let created = Post {
            id: Uuid::new_v4().to_string(),
            handle: state.unique_handle(&post.title),
            title: post.title.clone(),
            content: post.content.clone(),
            featured_image: post.featured_image.clone(),
            author: Author {
                id: user.id,
                name: user.name,
            },
            status: post.status,
            created_at: now,
            updated_at: now,
            published_at: (post.status == PostStatus::Published).then_some(now),
            tags: post.tags.clone(),
            reading_time: reading_time(&post.content),
        };

        state.posts.push(created.clone());
        Ok(created)
    }

    async fn get(&self, token: &str, id: &str) -> Result<Post, GatewayError> {
        let state = self.state.read().await;
        let index = state.owned_post_index(token, id)?;
        Ok(state.posts[index].clone())
    }

    async fn list(&self, token: &str) -> Result<Vec<Post>, GatewayError> {
        let state = self.state.read().await;
        let user_id = state.user_for(token)?.id.clone();

        Ok(state
            .posts
            .iter()
            .filter(|p| p.author.id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        token: &str,
        id: &str,
        changes: &PostChanges,
    ) -> Result<Post, GatewayError> {
        let mut state = self.state.write().await;
        let index = state.owned_post_index(token, id)?;
        let now = Utc::now();
        let post = &mut state.posts[index];

        if let Some(title) = &changes.title {
            post.title = title.clone();
        }
        if let Some(content) = &changes.content {
            post.content = content.clone();
            post.reading_time = reading_time(content);
        }
        if let Some(image) = &changes.featured_image {
            post.featured_image = (!image.is_empty()).then(|| image.clone());
        }
        if let Some(tags) = &changes.tags {
            post.tags = tags.clone();
        }
        if let Some(status) = changes.status {
            match status {
                PostStatus::Published if post.published_at.is_none() => {
                    post.published_at = Some(now)
                }
                PostStatus::Draft => post.published_at = None,
                PostStatus::Published => {}
            }
            post.status = status;
        }
        post.updated_at = now;

        Ok(post.clone())
    }

    async fn delete(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.write().await;
        let index = state.owned_post_index(token, id)?;
        state.posts.remove(index);
        Ok(())
    }

    async fn get_by_handle(&self, handle: &str) -> Result<Post, GatewayError> {
        let state = self.state.read().await;
        state
            .posts
            .iter()
            .find(|p| p.handle == handle && p.is_published())
            .cloned()
            .ok_or_else(|| GatewayError::api(404, "Post not found"))
    }

    async fn list_published(&self) -> Result<Vec<Post>, GatewayError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .iter()
            .filter(|p| p.is_published())
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, GatewayError> {
        let needle = query.trim().to_lowercase();
        let state = self.state.read().await;

        Ok(state
            .posts
            .iter()
            .filter(|p| p.is_published())
            .filter(|p| {
                needle.is_empty()
                    || p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
