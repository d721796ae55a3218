//! # DevDiary Shared
//!
//! Wire types: the JSON bodies exchanged with the blog backend and the
//! envelopes this tier answers its own clients with.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
