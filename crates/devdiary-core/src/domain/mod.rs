//! Domain entities - the records this tier observes from the backend.

mod post;
mod user;

pub use post::{Author, NewPost, Post, PostChanges, PostStatus};
pub use user::{Credentials, Registration, User};
