//! # DevDiary Core
//!
//! The domain layer of DevDiary.
//! This crate holds the post list query engine, input validation, the session
//! context and the ports the infrastructure layer implements. It performs no I/O.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod session;
pub mod text;
pub mod validation;

pub use error::{DomainError, GatewayError, SessionError};
pub use query::{DateBasis, PostQuery, SortKey, StatusFilter, tag_universe};
pub use session::{Session, SessionManager};
pub use validation::FieldErrors;
