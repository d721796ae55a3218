//! HTTP gateways to the external blog backend.

mod client;
mod posts;
mod users;

pub use client::{BackendClient, BackendConfig, ClientBuildError};
pub use posts::HttpPostGateway;
pub use users::HttpUserGateway;
