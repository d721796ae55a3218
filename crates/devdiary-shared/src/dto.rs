//! Data Transfer Objects.
//!
//! `*Request` and `*Envelope` types mirror the blog backend's JSON contract;
//! `*View` types are what this tier sends to its own clients.

use serde::{Deserialize, Serialize};

use devdiary_core::domain::{
    Credentials, NewPost, Post, PostChanges, PostStatus, Registration, User,
};

/// Body of `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    pub status: PostStatus,
}

impl From<&NewPost> for CreatePostRequest {
    fn from(post: &NewPost) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            featured_image: post.featured_image.clone(),
            tags: post.tags.clone(),
            status: post.status,
        }
    }
}

/// Body of `PUT /posts/{id}`. Only present fields are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

impl UpdatePostRequest {
    pub fn new(id: impl Into<String>, changes: &PostChanges) -> Self {
        Self {
            id: id.into(),
            title: changes.title.clone(),
            content: changes.content.clone(),
            featured_image: changes.featured_image.clone(),
            tags: changes.tags.clone(),
            status: changes.status,
        }
    }
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<&Credentials> for LoginRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        }
    }
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<&Registration> for RegisterRequest {
    fn from(registration: &Registration) -> Self {
        Self {
            name: registration.name.clone(),
            email: registration.email.clone(),
            password: registration.password.clone(),
        }
    }
}

/// `{ "post": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: Post,
}

/// `{ "posts": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListEnvelope {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// `{ "token": "..." }` returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEnvelope {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
}

/// `{ "user": {...} }` returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Error body sent by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// A filtered, ordered post list plus the tags available for filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListView {
    pub posts: Vec<Post>,
    pub tags: Vec<String>,
    /// Number of posts before filtering.
    pub total: usize,
}

/// A single post with what its public page needs around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageView {
    pub post: Post,
    pub description: String,
    pub display_date: String,
    pub author_initials: String,
}

/// Who is logged in, if anyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

/// Public profile of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub initials: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            initials: devdiary_core::text::initials(&user.name),
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// All tags used by published posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsView {
    pub tags: Vec<String>,
}
