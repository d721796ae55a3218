//! Typed form inputs and their validation rules.
//!
//! Inputs arrive as loosely-filled forms; each one is checked with
//! [`validator`] and turned into a domain value, or into [`FieldErrors`]
//! describing every field that failed.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

use crate::domain::{Credentials, NewPost, PostChanges, PostStatus, Registration};

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 100;
pub const CONTENT_MIN: usize = 50;
pub const PASSWORD_MIN: usize = 8;

/// Validation failures keyed by field name, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len < TITLE_MIN {
        return Err(failure("length", "Title must be at least 5 characters"));
    }
    if len > TITLE_MAX {
        return Err(failure("length", "Title must be less than 100 characters"));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().chars().count() < CONTENT_MIN {
        return Err(failure("length", "Content must be at least 50 characters"));
    }
    Ok(())
}

/// An empty image field means "no image".
fn validate_image_url(image: &str) -> Result<(), ValidationError> {
    let image = image.trim();
    if image.is_empty() || image.validate_url() {
        Ok(())
    } else {
        Err(failure("url", "Please enter a valid image URL"))
    }
}

/// Trim, drop blanks, de-duplicate while keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|t: &String| t == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

fn optional_image(image: &str) -> Option<String> {
    let image = image.trim();
    (!image.is_empty()).then(|| image.to_string())
}

/// Post editor form, used for creating a post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostInput {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_image_url"))]
    pub image: String,
    #[validate(custom(function = "validate_content"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
}

impl PostInput {
    pub fn into_new_post(self) -> Result<NewPost, FieldErrors> {
        self.validate()?;

        Ok(NewPost {
            title: self.title.trim().to_string(),
            featured_image: optional_image(&self.image),
            content: self.content,
            tags: normalize_tags(&self.tags),
            status: self.status,
        })
    }
}

/// Partial edit of an existing post. Absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostPatch {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub image: Option<String>,
    #[validate(custom(function = "validate_content"))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    pub fn into_changes(self) -> Result<PostChanges, FieldErrors> {
        self.validate()?;

        Ok(PostChanges {
            title: self.title.map(|t| t.trim().to_string()),
            // Clearing the image is sent as an empty string so the backend drops it.
            featured_image: self
                .image
                .map(|image| optional_image(&image).unwrap_or_default()),
            content: self.content,
            tags: self.tags.map(|tags| normalize_tags(&tags)),
            status: self.status,
        })
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginInput {
    pub fn into_credentials(self) -> Result<Credentials, FieldErrors> {
        self.validate()?;
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl RegisterInput {
    pub fn into_registration(self) -> Result<Registration, FieldErrors> {
        self.validate()?;
        Ok(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}
