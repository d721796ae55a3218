//! # DevDiary Infrastructure
//!
//! Concrete implementations of the ports defined in `devdiary-core`:
//! reqwest gateways to the blog backend, the session store, and an
//! in-memory backend used when no backend URL is configured.

pub mod http;
pub mod memory;
pub mod session;

pub use http::{BackendClient, BackendConfig, ClientBuildError, HttpPostGateway, HttpUserGateway};
pub use memory::InMemoryBackend;
pub use session::InMemorySessionStore;
