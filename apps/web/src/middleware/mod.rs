//! Middleware and extractors.

pub mod error;
pub mod session;
